//! User identity types consumed by the donation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::geo::Point;
use crate::config::{ROLE_DONOR, ROLE_VOLUNTEER};
use crate::errors::{AppError, AppResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Donor,
    Volunteer,
}

impl UserRole {
    pub fn is_donor(&self) -> bool {
        matches!(self, UserRole::Donor)
    }

    pub fn is_volunteer(&self) -> bool {
        matches!(self, UserRole::Volunteer)
    }
}

impl std::str::FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_DONOR => Ok(UserRole::Donor),
            ROLE_VOLUNTEER => Ok(UserRole::Volunteer),
            other => Err(AppError::validation(format!("unknown role: {}", other))),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Donor => write!(f, "{}", ROLE_DONOR),
            UserRole::Volunteer => write!(f, "{}", ROLE_VOLUNTEER),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    /// Last known position, used to center a volunteer's default search.
    pub location: Option<Point>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resolved identity attached to each authenticated request.
///
/// The transport layer authenticates the caller and hands the engine this
/// value; the engine never touches credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }

    /// Donor-only operations gate on this.
    pub fn require_donor(&self) -> AppResult<()> {
        if self.role.is_donor() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Volunteer-only operations gate on this.
    pub fn require_volunteer(&self) -> AppResult<()> {
        if self.role.is_volunteer() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// Donor fields attached to nearby-search results.
///
/// Carries every user field except the password hash, which must never
/// leave the identity store.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DonorSummary {
    pub id: Uuid,
    pub full_name: String,
    /// Shown so volunteers can coordinate the pickup.
    pub phone_number: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Point>,
}

impl From<User> for DonorSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            phone_number: user.phone_number,
            role: user.role,
            location: user.location,
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "Asha Rao")]
    pub full_name: String,
    #[schema(example = "+919876543210")]
    pub phone_number: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Point>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            phone_number: user.phone_number,
            role: user.role,
            location: user.location,
            created_at: user.created_at,
        }
    }
}
