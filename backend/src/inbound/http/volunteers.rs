//! Volunteer sign-up handlers.

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{Collection, Document};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthenticatedUser, VerifyJwt};
use crate::inbound::http::response::ok;
use crate::inbound::http::schemas::{
    AnyDocument, DocumentListResponse, ErrorResponse, InsertResponse,
};
use crate::inbound::http::state::HttpState;

#[utoipa::path(
    post,
    path = "/api/v1/volunteer-signup",
    request_body = AnyDocument,
    responses(
        (status = 200, description = "Sign-up stored", body = InsertResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["volunteers"],
    operation_id = "volunteerSignup"
)]
#[post("/volunteer-signup", wrap = "VerifyJwt")]
pub async fn volunteer_signup(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    body: web::Json<Document>,
) -> ApiResult<HttpResponse> {
    let outcome = state
        .records_command
        .insert(Collection::Volunteers, body.into_inner())
        .await?;
    Ok(ok(outcome))
}

#[utoipa::path(
    get,
    path = "/api/v1/get-volunteers",
    responses(
        (status = 200, description = "All volunteers", body = DocumentListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["volunteers"],
    operation_id = "listVolunteers",
    security([])
)]
#[get("/get-volunteers")]
pub async fn list_volunteers(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    Ok(ok(state.records.list(Collection::Volunteers).await?))
}
