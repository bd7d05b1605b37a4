//! Driving port for registration, login, and user lookup.
//!
//! HTTP handlers call this port without knowing how users are stored or
//! how passwords and tokens are produced.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials, Registration, UserProfile};

/// Account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create a user, rejecting emails that are already registered.
    async fn register(&self, registration: Registration) -> Result<(), Error>;

    /// Check credentials and issue a bearer token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;

    /// Look up a user by email. The password hash is never part of the profile.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, Error>;
}
