//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::Duration;
use serde_json::Value;

use crate::domain::Document;
use crate::domain::ports::TokenService;
use crate::outbound::memory::InMemoryDocumentStore;
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::state::HttpState;

/// Signing secret shared by [`memory_state`] and [`bearer_for`].
pub const TEST_SECRET: &[u8] = b"relief-test-secret";

pub fn test_tokens() -> JwtTokenService {
    JwtTokenService::new(TEST_SECRET, Duration::hours(1))
}

/// Handler state wired over a fresh in-memory store.
///
/// The store is returned too so tests can seed and inspect it.
pub fn memory_state() -> (HttpState, Arc<InMemoryDocumentStore>) {
    let store = Arc::new(InMemoryDocumentStore::new());
    let state = HttpState::from_adapters(
        store.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(test_tokens()),
    );
    (state, store)
}

/// `Authorization` header value carrying a valid token for `email`.
pub fn bearer_for(email: &str) -> String {
    let token = test_tokens().issue(email).expect("test token issues");
    format!("Bearer {}", token.as_ref())
}

/// Unwrap a JSON object literal into a [`Document`].
pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}
