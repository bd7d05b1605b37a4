//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every `/api/v1` handler is registered by [`api_scope`]. Protected routes
//! carry `wrap = "VerifyJwt"` on their route macro; the rest are public.

pub mod auth;
pub mod categories;
pub mod community;
pub mod donations;
pub mod error;
pub mod health;
pub mod response;
pub mod schemas;
pub mod state;
pub mod supplies;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod volunteers;

use actix_web::{Scope, web};

use crate::domain::{DocumentId, Error};

pub use error::ApiResult;

/// Parse a path identifier, rejecting blanks with 400.
pub(crate) fn parse_id(raw: &str) -> Result<DocumentId, Error> {
    DocumentId::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

/// The `/api/v1` scope with every handler and extractor config registered.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use relief_backend::inbound::http::api_scope;
///
/// let _app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(users::register)
        .service(users::login)
        .service(users::get_user)
        .service(supplies::create_supply)
        .service(supplies::list_supplies)
        .service(supplies::get_supply)
        .service(supplies::delete_supply)
        .service(supplies::update_supply)
        .service(categories::list_categories)
        .service(volunteers::volunteer_signup)
        .service(volunteers::list_volunteers)
        .service(donations::donate)
        .service(donations::list_donors)
        .service(community::create_comment)
        .service(community::list_comments)
        .service(community::create_testimonial)
        .service(community::list_testimonials)
}
