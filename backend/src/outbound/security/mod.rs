//! Credential adapters: token signing and password hashing.

mod argon2_hasher;
mod jwt;

pub use self::argon2_hasher::Argon2PasswordHasher;
pub use self::jwt::JwtTokenService;
