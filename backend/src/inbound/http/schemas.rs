//! OpenAPI schema definitions for response envelopes.
//!
//! Handlers build envelopes generically; these types mirror the concrete
//! shapes each endpoint returns so the generated document is precise. They
//! are only used for OpenAPI generation.

use std::borrow::Cow;

use utoipa::openapi::schema::{ObjectBuilder, Schema, Type};
use utoipa::openapi::RefOr;
use utoipa::{PartialSchema, ToSchema};

use crate::domain::{DeleteOutcome, ErrorCode, InsertOutcome, UpdateOutcome, UserProfile};

/// A schemaless JSON object as stored in a collection.
pub struct AnyDocument;

impl PartialSchema for AnyDocument {
    fn schema() -> RefOr<Schema> {
        ObjectBuilder::new()
            .schema_type(Type::Object)
            .description(Some("Free-form JSON document; `_id` is a string"))
            .into()
    }
}

impl ToSchema for AnyDocument {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("AnyDocument")
    }
}

/// Error body returned by every failing endpoint.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = true)]
    pub error: bool,
    pub code: ErrorCode,
    #[schema(example = "Unauthorized access!")]
    pub message: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub trace_id: Option<String>,
    pub details: Option<AnyDocument>,
}

/// `{ success: true }` with no payload.
#[derive(ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

/// `{ success, message }`.
#[derive(ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    #[schema(example = "User registered successfully")]
    pub message: String,
}

/// A full collection listing.
#[derive(ToSchema)]
pub struct DocumentListResponse {
    pub success: bool,
    pub data: Vec<AnyDocument>,
}

/// A single lookup; `data` is `null` when nothing matches.
#[derive(ToSchema)]
pub struct DocumentResponse {
    pub success: bool,
    pub data: Option<AnyDocument>,
}

#[derive(ToSchema)]
pub struct InsertResponse {
    pub success: bool,
    pub data: InsertOutcome,
}

#[derive(ToSchema)]
pub struct UpdateResponse {
    pub success: bool,
    pub data: UpdateOutcome,
}

#[derive(ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub data: DeleteOutcome,
}

/// User lookup; `data` is `null` for unknown emails.
#[derive(ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub data: Option<UserProfile>,
}
