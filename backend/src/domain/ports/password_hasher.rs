//! Driven port for password hashing.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Hashing failures.
    pub enum PasswordHashError {
        /// Producing a hash failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// One-way password hashing used at registration and login.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt, returning a self-describing string.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against a hash produced by [`PasswordHasher::hash`].
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
