//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the response envelope schemas,
//! and the bearer token security scheme. Debug builds serve it through
//! Swagger UI; `cargo run --bin openapi-dump` prints it for tooling.

use crate::domain::{DeleteOutcome, ErrorCode, InsertOutcome, UpdateOutcome, UserProfile};
use crate::inbound::http::health::ServerStatus;
use crate::inbound::http::schemas::{
    AnyDocument, DeleteResponse, DocumentListResponse, DocumentResponse, ErrorResponse,
    InsertResponse, MessageResponse, SuccessResponse, UpdateResponse, UserResponse,
};
use crate::inbound::http::users::{LoginRequest, LoginResponse, RegisterRequest};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Adds the JWT bearer scheme to the generated components.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Relief backend API",
        description = "Supplies, donations, volunteers, and community feedback behind bearer token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::health::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::get_user,
        crate::inbound::http::supplies::create_supply,
        crate::inbound::http::supplies::list_supplies,
        crate::inbound::http::supplies::get_supply,
        crate::inbound::http::supplies::delete_supply,
        crate::inbound::http::supplies::update_supply,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::volunteers::volunteer_signup,
        crate::inbound::http::volunteers::list_volunteers,
        crate::inbound::http::donations::donate,
        crate::inbound::http::donations::list_donors,
        crate::inbound::http::community::create_comment,
        crate::inbound::http::community::list_comments,
        crate::inbound::http::community::create_testimonial,
        crate::inbound::http::community::list_testimonials,
    ),
    components(schemas(
        AnyDocument,
        ErrorCode,
        ErrorResponse,
        SuccessResponse,
        MessageResponse,
        DocumentListResponse,
        DocumentResponse,
        InsertOutcome,
        InsertResponse,
        UpdateOutcome,
        UpdateResponse,
        DeleteOutcome,
        DeleteResponse,
        UserProfile,
        UserResponse,
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        ServerStatus,
    )),
    tags(
        (name = "health", description = "Status banner and probes"),
        (name = "users", description = "Registration, login, and profile lookup"),
        (name = "supplies", description = "Relief supply catalogue"),
        (name = "donations", description = "Categories and donation recording"),
        (name = "volunteers", description = "Volunteer sign-ups"),
        (name = "community", description = "Comments and testimonials")
    )
)]
pub struct ApiDoc;
