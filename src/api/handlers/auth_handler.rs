//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Point, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::services::TokenResponse;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User display name
    #[validate(length(min = 1, message = "Full name is required"))]
    #[schema(example = "Asha Rao")]
    pub full_name: String,
    /// Phone number used as the login identifier
    #[validate(length(min = 7, message = "A valid phone number is required"))]
    #[schema(example = "+919876543210")]
    pub phone_number: String,
    /// User password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Account role: "donor" or "volunteer"
    #[schema(example = "volunteer")]
    pub role: String,
    /// Optional home location, used to center a volunteer's default search
    pub location: Option<Point>,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Phone number used as the login identifier
    #[validate(length(min = 7, message = "A valid phone number is required"))]
    #[schema(example = "+919876543210")]
    pub phone_number: String,
    /// User password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let role: UserRole = payload
        .role
        .parse()
        .map_err(|_| AppError::validation("role must be donor or volunteer"))?;

    let user = state
        .auth_service
        .register(
            payload.full_name,
            payload.phone_number,
            payload.password,
            role,
            payload.location,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.phone_number, payload.password)
        .await?;

    Ok(Json(token))
}
