//! Account API handlers.
//!
//! ```text
//! POST /api/v1/register {"name":"Ada","email":"ada@example.com","password":"pw"}
//! POST /api/v1/login {"email":"ada@example.com","password":"pw"}
//! GET /api/v1/user?email=ada@example.com
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{CredentialsValidationError, Error, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::response::ok;
use crate::inbound::http::schemas::{ErrorResponse, MessageResponse, UserResponse};
use crate::inbound::http::state::HttpState;

/// Message returned after a successful registration.
pub const REGISTERED_MESSAGE: &str = "User registered successfully";
/// Message returned after a successful login.
pub const LOGIN_MESSAGE: &str = "Login successful";

/// Registration request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    #[schema(example = "Login successful")]
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    success: bool,
    message: &'static str,
}

/// Query string for `GET /api/v1/user`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserQuery {
    /// Email of the user to look up.
    pub email: String,
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let (field, code) = match err {
        CredentialsValidationError::EmptyEmail => ("email", "empty_email"),
        CredentialsValidationError::EmptyPassword => ("password", "empty_password"),
        CredentialsValidationError::EmptyName => ("name", "empty_name"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Invalid request or user exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(&name, &email, &password).map_err(map_credentials_error)?;
    state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(MessageBody {
        success: true,
        message: REGISTERED_MESSAGE,
    }))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_credentials_error)?;
    let token = state.accounts.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        message: LOGIN_MESSAGE.to_owned(),
        token: token.into_inner(),
    }))
}

/// Look up a user by email. The password hash is never returned.
#[utoipa::path(
    get,
    path = "/api/v1/user",
    params(UserQuery),
    responses(
        (status = 200, description = "User profile or null", body = UserResponse),
        (status = 400, description = "Missing email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "getUserByEmail",
    security([])
)]
#[get("/user")]
pub async fn get_user(
    state: web::Data<HttpState>,
    query: web::Query<UserQuery>,
) -> ApiResult<HttpResponse> {
    let profile = state.accounts.find_by_email(query.email.trim()).await?;
    Ok(ok(profile))
}
