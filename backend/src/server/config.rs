//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use relief_backend::domain::ports::{DocumentStore, PasswordHasher, TokenService};

/// Resolved adapters and binding for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) hasher: Arc<dyn PasswordHasher>,
    pub(crate) tokens: Arc<dyn TokenService>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        store: Arc<dyn DocumentStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            bind_addr,
            store,
            hasher,
            tokens,
        }
    }
}
