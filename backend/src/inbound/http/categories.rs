//! Donation category listing.
//!
//! Categories are seeded out of band; the API only reads them. Their
//! `totalDonate` counters move when donations are recorded.

use actix_web::{HttpResponse, get, web};

use crate::domain::Collection;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthenticatedUser, VerifyJwt};
use crate::inbound::http::response::ok;
use crate::inbound::http::schemas::{DocumentListResponse, ErrorResponse};
use crate::inbound::http::state::HttpState;

#[utoipa::path(
    get,
    path = "/api/v1/donation-category",
    responses(
        (status = 200, description = "All categories", body = DocumentListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["donations"],
    operation_id = "listCategories"
)]
#[get("/donation-category", wrap = "VerifyJwt")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    Ok(ok(state.records.list(Collection::Categories).await?))
}
