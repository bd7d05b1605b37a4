//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such
//! as tracing. The bearer-token gate lives with the HTTP adapter in
//! [`crate::inbound::http::auth`].

pub mod trace;

pub use trace::Trace;
