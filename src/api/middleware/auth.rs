//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{Actor, UserRole};
use crate::errors::AppError;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub full_name: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// The resolved identity handed to the service layer.
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    // A token minted before a role rename would carry an unknown role;
    // treat it like any other stale credential.
    let role = claims
        .role
        .parse::<UserRole>()
        .map_err(|_| AppError::Unauthorized)?;

    let current_user = CurrentUser {
        id: claims.sub,
        full_name: claims.full_name,
        role,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
