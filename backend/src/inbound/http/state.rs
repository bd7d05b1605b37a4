//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O. The
//! bearer-token gate reads `tokens` from the same state.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, DocumentStore, DonationCommand, PasswordHasher, RecordsCommand, RecordsQuery,
    TokenService,
};
use crate::domain::{AccountServiceImpl, DonationRecorder, RecordsService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub tokens: Arc<dyn TokenService>,
    pub donations: Arc<dyn DonationCommand>,
    pub records: Arc<dyn RecordsQuery>,
    pub records_command: Arc<dyn RecordsCommand>,
}

impl HttpState {
    /// Wire the domain services over the given driven adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use chrono::Duration;
    /// use relief_backend::inbound::http::state::HttpState;
    /// use relief_backend::outbound::memory::InMemoryDocumentStore;
    /// use relief_backend::outbound::security::{Argon2PasswordHasher, JwtTokenService};
    ///
    /// let state = HttpState::from_adapters(
    ///     Arc::new(InMemoryDocumentStore::new()),
    ///     Arc::new(Argon2PasswordHasher::new()),
    ///     Arc::new(JwtTokenService::new(b"secret", Duration::hours(1))),
    /// );
    /// let _tokens = state.tokens.clone();
    /// ```
    pub fn from_adapters(
        store: Arc<dyn DocumentStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        let records = Arc::new(RecordsService::new(store.clone()));
        Self {
            accounts: Arc::new(AccountServiceImpl::new(
                store.clone(),
                hasher,
                tokens.clone(),
            )),
            tokens,
            donations: Arc::new(DonationRecorder::new(store)),
            records: records.clone(),
            records_command: records,
        }
    }
}
