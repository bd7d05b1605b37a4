//! Donation recording and donor listing.

use actix_web::{HttpResponse, get, post, web};
use tracing::debug;

use crate::domain::{Collection, Document, DonationOutcome, DonationSubmission, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthenticatedUser, VerifyJwt};
use crate::inbound::http::response::{Envelope, ok};
use crate::inbound::http::schemas::{
    AnyDocument, DocumentListResponse, ErrorResponse, InsertResponse,
};
use crate::inbound::http::state::HttpState;

/// Record a donation.
///
/// A returning donor gets `{ success: true }`; a first donation also returns
/// the insert result of the new donor record.
#[utoipa::path(
    post,
    path = "/api/v1/donation",
    request_body = AnyDocument,
    responses(
        (status = 200, description = "Donation recorded", body = InsertResponse),
        (status = 400, description = "Missing category or userEmail", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Unknown category", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["donations"],
    operation_id = "donate"
)]
#[post("/donation", wrap = "VerifyJwt")]
pub async fn donate(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    body: web::Json<Document>,
) -> ApiResult<HttpResponse> {
    let submission =
        DonationSubmission::try_from_document(body.into_inner()).map_err(Error::from)?;
    debug!(
        caller = %user.email(),
        donor = %submission.user_email(),
        "donation submitted"
    );
    match state.donations.record(submission).await? {
        DonationOutcome::DonorUpdated => Ok(HttpResponse::Ok().json(Envelope::empty())),
        DonationOutcome::DonorInserted(outcome) => Ok(ok(outcome)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/donner-info",
    responses(
        (status = 200, description = "All donor records", body = DocumentListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["donations"],
    operation_id = "listDonors",
    security([])
)]
#[get("/donner-info")]
pub async fn list_donors(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    Ok(ok(state.records.list(Collection::Donations).await?))
}
