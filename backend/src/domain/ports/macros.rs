//! `define_port_error!` generates port error enums together with snake-case
//! constructors, so adapters can write `DocumentStoreError::query("boom")`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $( define_port_error!(@constructor $variant $( $($field : $ty),* )?); )*
        }
    };

    // Unit variant: `Offline` becomes `offline()`.
    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    // Struct variant: every field is taken as `impl Into<T>`.
    (@constructor $variant:ident $($field:ident : $ty:ty),+) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                Self::$variant {
                    $($field: $field.into()),+
                }
            }
        }
    };
}

pub(crate) use define_port_error;
