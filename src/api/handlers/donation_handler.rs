//! Donation handlers.
//!
//! Thin HTTP adapters over the donation service: deserialize, validate
//! shape, resolve the actor from the request extensions, and serialize the
//! typed result or error.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Donation, FoodItem, NearbyDonation, Point};
use crate::errors::{AppError, AppResult};
use crate::services::{DonationFields, NearbyQuery};

/// Donation listing payload, shared by create and edit (edits replace the
/// whole listing).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DonationRequest {
    /// What is being donated
    #[validate(length(min = 1, message = "At least one food item is required"))]
    pub food_items: Vec<FoodItem>,
    /// How many people the donation can feed
    #[validate(range(min = 1, message = "Serves must be a positive number"))]
    #[schema(example = 10)]
    pub serves: i32,
    /// Deadline for picking the food up
    pub pickup_by: DateTime<Utc>,
    /// Where the food is
    pub location: Point,
}

impl From<DonationRequest> for DonationFields {
    fn from(request: DonationRequest) -> Self {
        Self {
            food_items: request.food_items,
            serves: request.serves,
            pickup_by: request.pickup_by,
            location: request.location,
        }
    }
}

/// Query parameters for the nearby search
#[derive(Debug, Deserialize, IntoParams)]
pub struct NearbyParams {
    /// Latitude of the search origin
    pub lat: Option<f64>,
    /// Longitude of the search origin
    pub lng: Option<f64>,
    /// Keep only donations that serve at least this many people
    pub min_serves: Option<i32>,
}

impl NearbyParams {
    /// Missing coordinates are a caller error; a missing or negative
    /// serves floor just means "no floor".
    fn into_query(self) -> AppResult<NearbyQuery> {
        let (Some(lat), Some(lng)) = (self.lat, self.lng) else {
            return Err(AppError::validation(
                "latitude and longitude are required",
            ));
        };

        Ok(NearbyQuery::new(Point::new(lng, lat))
            .with_min_serves(self.min_serves.unwrap_or(0).max(0)))
    }
}

/// Create donation routes
pub fn donation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_donation))
        .route("/mine", get(my_donations))
        .route("/pickups", get(my_pickups))
        .route("/nearby", get(nearby_donations))
        .route("/:id", get(get_donation).put(update_donation))
        .route("/:id/accept", patch(accept_donation))
        .route("/:id/reject", patch(reject_donation))
        .route("/:id/complete", patch(complete_donation))
}

/// Post a new donation
#[utoipa::path(
    post,
    path = "/donations",
    tag = "Donations",
    security(("bearer_auth" = [])),
    request_body = DonationRequest,
    responses(
        (status = 201, description = "Donation created", body = Donation),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Donors only")
    )
)]
pub async fn create_donation(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<DonationRequest>,
) -> AppResult<(StatusCode, Json<Donation>)> {
    let donation = state
        .donation_service
        .create_donation(current_user.actor(), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(donation)))
}

/// List the authenticated donor's donations
#[utoipa::path(
    get,
    path = "/donations/mine",
    tag = "Donations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Donations posted by the caller", body = Vec<Donation>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_donations(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Donation>>> {
    let donations = state
        .donation_service
        .list_donations_by_donor(current_user.id)
        .await?;

    Ok(Json(donations))
}

/// List the authenticated volunteer's accepted pickups
#[utoipa::path(
    get,
    path = "/donations/pickups",
    tag = "Donations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Donations assigned to the caller", body = Vec<Donation>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_pickups(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Donation>>> {
    let donations = state
        .donation_service
        .list_donations_by_volunteer(current_user.id)
        .await?;

    Ok(Json(donations))
}

/// Search for donations near a point
#[utoipa::path(
    get,
    path = "/donations/nearby",
    tag = "Donations",
    security(("bearer_auth" = [])),
    params(NearbyParams),
    responses(
        (status = 200, description = "Nearby donations, nearest first", body = Vec<NearbyDonation>),
        (status = 400, description = "Missing or invalid coordinates"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn nearby_donations(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> AppResult<Json<Vec<NearbyDonation>>> {
    let results = state
        .donation_service
        .find_nearby_donations(params.into_query()?)
        .await?;

    Ok(Json(results))
}

/// Fetch a single donation
#[utoipa::path(
    get,
    path = "/donations/{id}",
    tag = "Donations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Donation ID")),
    responses(
        (status = 200, description = "The donation", body = Donation),
        (status = 404, description = "Donation not found")
    )
)]
pub async fn get_donation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Donation>> {
    let donation = state.donation_service.get_donation(id).await?;
    Ok(Json(donation))
}

/// Replace the listing fields of an Available donation
#[utoipa::path(
    put,
    path = "/donations/{id}",
    tag = "Donations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Donation ID")),
    request_body = DonationRequest,
    responses(
        (status = 200, description = "Updated donation", body = Donation),
        (status = 403, description = "Forbidden - Owning donor only"),
        (status = 404, description = "Donation not found"),
        (status = 409, description = "Donation is no longer editable")
    )
)]
pub async fn update_donation(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<DonationRequest>,
) -> AppResult<Json<Donation>> {
    let donation = state
        .donation_service
        .edit_donation(current_user.actor(), id, payload.into())
        .await?;

    Ok(Json(donation))
}

/// Accept a donation for pickup
#[utoipa::path(
    patch,
    path = "/donations/{id}/accept",
    tag = "Donations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Donation ID")),
    responses(
        (status = 200, description = "Pickup accepted", body = Donation),
        (status = 403, description = "Forbidden - Volunteers only"),
        (status = 404, description = "Donation not found"),
        (status = 409, description = "Donation is no longer available")
    )
)]
pub async fn accept_donation(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Donation>> {
    let donation = state
        .donation_service
        .accept_donation(current_user.actor(), id)
        .await?;

    Ok(Json(donation))
}

/// Give an accepted pickup back
#[utoipa::path(
    patch,
    path = "/donations/{id}/reject",
    tag = "Donations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Donation ID")),
    responses(
        (status = 200, description = "Pickup returned to the pool", body = Donation),
        (status = 403, description = "Forbidden - Assigned volunteer only"),
        (status = 404, description = "Donation not found")
    )
)]
pub async fn reject_donation(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Donation>> {
    let donation = state
        .donation_service
        .reject_donation(current_user.actor(), id)
        .await?;

    Ok(Json(donation))
}

/// Mark an accepted pickup as delivered
#[utoipa::path(
    patch,
    path = "/donations/{id}/complete",
    tag = "Donations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Donation ID")),
    responses(
        (status = 200, description = "Pickup completed", body = Donation),
        (status = 403, description = "Forbidden - Assigned volunteer only"),
        (status = 404, description = "Donation not found")
    )
)]
pub async fn complete_donation(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Donation>> {
    let donation = state
        .donation_service
        .complete_donation(current_user.actor(), id)
        .await?;

    Ok(Json(donation))
}
