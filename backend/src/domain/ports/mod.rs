//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`DocumentStore`, `TokenService`, `PasswordHasher`) are
//! implemented by outbound adapters. Driving ports (`AccountService`,
//! `DonationCommand`, `RecordsQuery`, `RecordsCommand`) are implemented by
//! domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod document_store;
mod donation_command;
mod password_hasher;
mod records;
mod token_service;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::AccountService;
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{DocumentStore, DocumentStoreError};
#[cfg(test)]
pub use donation_command::MockDonationCommand;
pub use donation_command::DonationCommand;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use records::{MockRecordsCommand, MockRecordsQuery};
pub use records::{RecordsCommand, RecordsQuery};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
