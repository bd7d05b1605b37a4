//! Comments and testimonials: authenticated writes, public reads.

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{Collection, Document};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthenticatedUser, VerifyJwt};
use crate::inbound::http::response::ok;
use crate::inbound::http::schemas::{
    AnyDocument, DocumentListResponse, ErrorResponse, InsertResponse,
};
use crate::inbound::http::state::HttpState;

async fn insert(
    state: &HttpState,
    collection: Collection,
    body: Document,
) -> ApiResult<HttpResponse> {
    Ok(ok(state.records_command.insert(collection, body).await?))
}

async fn list(state: &HttpState, collection: Collection) -> ApiResult<HttpResponse> {
    Ok(ok(state.records.list(collection).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/comments",
    request_body = AnyDocument,
    responses(
        (status = 200, description = "Comment stored", body = InsertResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["community"],
    operation_id = "createComment"
)]
#[post("/comments", wrap = "VerifyJwt")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    body: web::Json<Document>,
) -> ApiResult<HttpResponse> {
    insert(&state, Collection::Comments, body.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/v1/comments",
    responses(
        (status = 200, description = "All comments", body = DocumentListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["community"],
    operation_id = "listComments",
    security([])
)]
#[get("/comments")]
pub async fn list_comments(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    list(&state, Collection::Comments).await
}

#[utoipa::path(
    post,
    path = "/api/v1/testimonial",
    request_body = AnyDocument,
    responses(
        (status = 200, description = "Testimonial stored", body = InsertResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["community"],
    operation_id = "createTestimonial"
)]
#[post("/testimonial", wrap = "VerifyJwt")]
pub async fn create_testimonial(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    body: web::Json<Document>,
) -> ApiResult<HttpResponse> {
    insert(&state, Collection::Testimonials, body.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/v1/testimonial",
    responses(
        (status = 200, description = "All testimonials", body = DocumentListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["community"],
    operation_id = "listTestimonials",
    security([])
)]
#[get("/testimonial")]
pub async fn list_testimonials(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    list(&state, Collection::Testimonials).await
}
