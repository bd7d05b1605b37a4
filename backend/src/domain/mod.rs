//! Domain primitives, services, and ports.
//!
//! Purpose: Define strongly typed domain entities used by the API and the
//! storage adapters, plus the services that implement the use-cases. Keep
//! transport and database concerns out of this module.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Document vocabulary (`Collection`, `Filter`, `Update`, outcomes).
//! - Services: `AccountServiceImpl`, `DonationRecorder`, `RecordsService`.

pub mod accounts;
pub mod auth;
pub mod document;
pub mod donation;
pub mod error;
pub mod ports;
pub mod records;
pub mod trace_id;
pub mod user;

pub use self::accounts::AccountServiceImpl;
pub use self::auth::{
    AccessToken, CredentialsValidationError, LoginCredentials, Registration, TokenClaims,
};
pub use self::document::{
    Collection, DeleteOutcome, Document, DocumentId, DocumentIdValidationError, Filter, ID_FIELD,
    InsertOutcome, Update, UpdateOptions, UpdateOutcome,
};
pub use self::donation::{
    DonationOutcome, DonationRecorder, DonationSubmission, DonationValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::records::RecordsService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserProfile, UserRecord};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use relief_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
