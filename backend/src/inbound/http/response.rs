//! Success envelope shared by every data endpoint.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

/// `{ "success": true, "data": ... }`.
///
/// `data` is omitted entirely when the outer option is `None`; `Some(None)`
/// renders an explicit `null`, which lookups use for "no match".
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
        }
    }
}

/// 200 with `{ success: true, data }`.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::build(StatusCode::OK).json(Envelope::data(data))
}
