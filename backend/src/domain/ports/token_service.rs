//! Driven port for issuing and verifying stateless bearer tokens.

use crate::domain::{AccessToken, TokenClaims};

use super::define_port_error;

define_port_error! {
    /// Reasons a token could not be issued or accepted.
    pub enum TokenError {
        /// Signature, structure, or claims are invalid.
        Invalid { message: String } => "token rejected: {message}",
        /// The token is past its expiry.
        Expired => "token expired",
        /// Signing failed.
        Issue { message: String } => "token could not be issued: {message}",
    }
}

/// Signs and verifies tokens carrying the caller's email.
///
/// Verification is a single synchronous step with no server-side state, so
/// the authentication middleware can call it inline.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a new token for `email`.
    fn issue(&self, email: &str) -> Result<AccessToken, TokenError>;

    /// Check signature and expiry, returning the decoded claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
