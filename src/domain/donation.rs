//! Donation aggregate and its lifecycle status taxonomy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::geo::Point;
use super::user::DonorSummary;
use crate::errors::AppError;

/// A single line of a donation listing, e.g. "Rice" / "5 kg".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FoodItem {
    #[schema(example = "Rice")]
    pub name: String,
    /// Free-form amount, e.g. "5 kg" or "20 packets"
    #[schema(example = "5 kg")]
    pub quantity: String,
}

/// Donation lifecycle states.
///
/// Available -> PickupAccepted -> Completed, with PickupAccepted -> Available
/// on rejection. Expired is produced by an external time-based sweep, never
/// by this engine. Cancelled is declared for forward compatibility; no code
/// path currently produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DonationStatus {
    Available,
    #[serde(rename = "Pickup Accepted")]
    PickupAccepted,
    Completed,
    Expired,
    Cancelled,
}

impl DonationStatus {
    /// Stable string form, also used for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Available => "Available",
            DonationStatus::PickupAccepted => "Pickup Accepted",
            DonationStatus::Completed => "Completed",
            DonationStatus::Expired => "Expired",
            DonationStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether the donation should still surface in volunteer-facing search.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            DonationStatus::Available | DonationStatus::PickupAccepted
        )
    }
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DonationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(DonationStatus::Available),
            "Pickup Accepted" => Ok(DonationStatus::PickupAccepted),
            "Completed" => Ok(DonationStatus::Completed),
            "Expired" => Ok(DonationStatus::Expired),
            "Cancelled" => Ok(DonationStatus::Cancelled),
            other => Err(AppError::internal(format!(
                "unknown donation status: {}",
                other
            ))),
        }
    }
}

/// Donation domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Donation {
    pub id: Uuid,
    /// Owning donor; set at creation, immutable afterwards.
    pub donor_id: Uuid,
    pub food_items: Vec<FoodItem>,
    /// How many people the donation can feed.
    pub serves: i32,
    /// Deadline after which the food should no longer be picked up.
    pub pickup_by: DateTime<Utc>,
    pub status: DonationStatus,
    pub location: Point,
    /// Assigned volunteer; non-null exactly while status is
    /// PickupAccepted or Completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a fresh donation; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDonation {
    pub donor_id: Uuid,
    pub food_items: Vec<FoodItem>,
    pub serves: i32,
    pub pickup_by: DateTime<Utc>,
    pub location: Point,
}

/// One row of the nearby search result: the donation, its donor with
/// secrets stripped, and the great-circle distance from the query origin.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NearbyDonation {
    pub donation: Donation,
    pub donor: DonorSummary,
    pub distance_meters: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            DonationStatus::Available,
            DonationStatus::PickupAccepted,
            DonationStatus::Completed,
            DonationStatus::Expired,
            DonationStatus::Cancelled,
        ] {
            let parsed: DonationStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert!("Pending".parse::<DonationStatus>().is_err());
    }

    #[test]
    fn pickup_accepted_serializes_with_space() {
        let json = serde_json::to_string(&DonationStatus::PickupAccepted).unwrap();
        assert_eq!(json, "\"Pickup Accepted\"");
    }

    #[test]
    fn only_available_and_accepted_are_active() {
        assert!(DonationStatus::Available.is_active());
        assert!(DonationStatus::PickupAccepted.is_active());
        assert!(!DonationStatus::Completed.is_active());
        assert!(!DonationStatus::Expired.is_active());
        assert!(!DonationStatus::Cancelled.is_active());
    }
}
