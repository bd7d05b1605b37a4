//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **mongo**: MongoDB-backed [`DocumentStore`](crate::domain::ports::DocumentStore)
//! - **memory**: in-process document store for local runs and tests
//! - **security**: JWT token service and Argon2 password hasher
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod mongo;
pub mod security;
