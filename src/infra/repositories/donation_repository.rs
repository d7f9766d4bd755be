//! Donation repository - Persistence with conditional writes and
//! proximity search.
//!
//! Every status mutation goes through `update_where`, a compare-and-swap
//! keyed on the donation's current state. A plain read-modify-write save
//! would reintroduce the lost-update race between concurrent volunteers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::donation::{ActiveModel, Column, Entity as DonationEntity};
use crate::domain::{Donation, DonationStatus, FoodItem, NewDonation, Point};
use crate::errors::{AppError, AppResult};

/// Expected current state for a conditional donation write.
///
/// Unset fields are not checked. The predicate is evaluated atomically with
/// the patch by the store, so a caller whose expectation no longer holds
/// loses cleanly with `PreconditionFailed` instead of overwriting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonationPredicate {
    pub status: Option<DonationStatus>,
    /// Expected volunteer assignment; `Some(None)` asserts unassigned.
    pub volunteer_id: Option<Option<Uuid>>,
}

impl DonationPredicate {
    /// Require the donation to still be in `status`.
    pub fn status_is(status: DonationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Require the donation to still be assigned to `volunteer_id`.
    pub fn volunteer_is(volunteer_id: Uuid) -> Self {
        Self {
            volunteer_id: Some(Some(volunteer_id)),
            ..Default::default()
        }
    }
}

/// Field changes applied by a conditional write. Unset fields keep their
/// current value; `updated_at` is always bumped by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonationPatch {
    pub food_items: Option<Vec<FoodItem>>,
    pub serves: Option<i32>,
    pub pickup_by: Option<DateTime<Utc>>,
    pub location: Option<Point>,
    pub status: Option<DonationStatus>,
    /// `Some(None)` clears the volunteer assignment.
    pub volunteer_id: Option<Option<Uuid>>,
}

/// Donation store consumed by the lifecycle engine and proximity matcher.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Insert a new donation; the store assigns id and timestamps
    async fn insert(&self, donation: NewDonation) -> AppResult<Donation>;

    /// Point lookup by id
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Donation>>;

    /// Conditional update: applies `patch` only while `predicate` still
    /// holds for the row, atomically. Fails with `PreconditionFailed` when
    /// a concurrent writer got there first (or the row is gone).
    async fn update_where(
        &self,
        id: Uuid,
        predicate: DonationPredicate,
        patch: DonationPatch,
    ) -> AppResult<Donation>;

    /// All donations posted by a donor, newest first
    async fn list_by_donor(&self, donor_id: Uuid) -> AppResult<Vec<Donation>>;

    /// All donations assigned to a volunteer, most recently updated first
    async fn list_by_volunteer(&self, volunteer_id: Uuid) -> AppResult<Vec<Donation>>;

    /// Donations within `max_distance_meters` of `origin`, paired with
    /// their great-circle distance, ordered by distance ascending with id
    /// as tiebreak
    async fn find_near(
        &self,
        origin: Point,
        max_distance_meters: f64,
    ) -> AppResult<Vec<(Donation, f64)>>;
}

/// SeaORM-backed implementation of `DonationRepository`.
///
/// Proximity search runs an indexed bounding-box prefilter over the
/// position columns, then computes exact spherical distances in memory for
/// the (small) candidate set.
pub struct DonationStore {
    db: DatabaseConnection,
}

impl DonationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DonationRepository for DonationStore {
    async fn insert(&self, donation: NewDonation) -> AppResult<Donation> {
        let food_items = serde_json::to_value(&donation.food_items)
            .map_err(|e| AppError::internal(format!("food_items serialization failed: {}", e)))?;

        let now = Utc::now();
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            donor_id: Set(donation.donor_id),
            food_items: Set(food_items),
            serves: Set(donation.serves),
            pickup_by: Set(donation.pickup_by),
            status: Set(DonationStatus::Available.as_str().to_string()),
            longitude: Set(donation.location.longitude),
            latitude: Set(donation.location.latitude),
            volunteer_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        Donation::try_from(model)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Donation>> {
        let model = DonationEntity::find_by_id(id).one(&self.db).await?;
        model.map(Donation::try_from).transpose()
    }

    async fn update_where(
        &self,
        id: Uuid,
        predicate: DonationPredicate,
        patch: DonationPatch,
    ) -> AppResult<Donation> {
        let mut query = DonationEntity::update_many().filter(Column::Id.eq(id));

        if let Some(status) = &predicate.status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(expected) = &predicate.volunteer_id {
            query = match expected {
                Some(volunteer) => query.filter(Column::VolunteerId.eq(*volunteer)),
                None => query.filter(Column::VolunteerId.is_null()),
            };
        }

        if let Some(items) = &patch.food_items {
            let json = serde_json::to_value(items).map_err(|e| {
                AppError::internal(format!("food_items serialization failed: {}", e))
            })?;
            query = query.col_expr(Column::FoodItems, Expr::value(json));
        }
        if let Some(serves) = patch.serves {
            query = query.col_expr(Column::Serves, Expr::value(serves));
        }
        if let Some(pickup_by) = patch.pickup_by {
            query = query.col_expr(Column::PickupBy, Expr::value(pickup_by));
        }
        if let Some(location) = patch.location {
            query = query
                .col_expr(Column::Longitude, Expr::value(location.longitude))
                .col_expr(Column::Latitude, Expr::value(location.latitude));
        }
        if let Some(status) = &patch.status {
            query = query.col_expr(Column::Status, Expr::value(status.as_str()));
        }
        if let Some(volunteer) = &patch.volunteer_id {
            query = query.col_expr(Column::VolunteerId, Expr::value(*volunteer));
        }
        query = query.col_expr(Column::UpdatedAt, Expr::value(Utc::now()));

        let result = query.exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::PreconditionFailed);
        }

        let model = DonationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        Donation::try_from(model)
    }

    async fn list_by_donor(&self, donor_id: Uuid) -> AppResult<Vec<Donation>> {
        let models = DonationEntity::find()
            .filter(Column::DonorId.eq(donor_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Donation::try_from).collect()
    }

    async fn list_by_volunteer(&self, volunteer_id: Uuid) -> AppResult<Vec<Donation>> {
        let models = DonationEntity::find()
            .filter(Column::VolunteerId.eq(volunteer_id))
            .order_by_desc(Column::UpdatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Donation::try_from).collect()
    }

    async fn find_near(
        &self,
        origin: Point,
        max_distance_meters: f64,
    ) -> AppResult<Vec<(Donation, f64)>> {
        let bbox = origin.bounding_box(max_distance_meters);

        let models = DonationEntity::find()
            .filter(Column::Latitude.between(bbox.min_latitude, bbox.max_latitude))
            .filter(Column::Longitude.between(bbox.min_longitude, bbox.max_longitude))
            .all(&self.db)
            .await?;

        let mut hits = Vec::with_capacity(models.len());
        for model in models {
            let donation = Donation::try_from(model)?;
            let distance = origin.distance_meters(&donation.location);
            // The bounding box over-approximates the circle; drop corners.
            if distance <= max_distance_meters {
                hits.push((donation, distance));
            }
        }

        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));
        Ok(hits)
    }
}
