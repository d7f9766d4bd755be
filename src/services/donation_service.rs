//! Donation service - Lifecycle transitions and proximity matching.
//!
//! Owns every status change a donation can go through. Transitions follow a
//! read-validate-conditional-write discipline: preconditions are checked on
//! a fresh read, then the write is applied only if the row still matches,
//! so concurrent actors on the same donation cannot overwrite each other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{DEFAULT_MIN_SERVES, DEFAULT_NEARBY_RADIUS_METERS};
use crate::domain::{
    validate, Actor, Donation, DonationStatus, DonorSummary, FoodItem, NearbyDonation,
    NewDonation, Point,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{DonationPatch, DonationPredicate, DonationRepository, UserRepository};

/// Lost conditional writes are retried this many times from a fresh read
/// before the engine gives up and reports the state conflict.
const CAS_RETRIES: u32 = 1;

/// Replacement fields for a donation listing, used on create and edit.
/// Edits replace the whole set rather than patching individual fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationFields {
    pub food_items: Vec<FoodItem>,
    pub serves: i32,
    pub pickup_by: DateTime<Utc>,
    pub location: Point,
}

/// Parameters for the nearby search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub origin: Point,
    /// Keep only donations that can feed at least this many people.
    pub min_serves: i32,
    pub max_distance_meters: f64,
}

impl NearbyQuery {
    /// Search around `origin` with the default radius and no serves floor.
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            min_serves: DEFAULT_MIN_SERVES,
            max_distance_meters: DEFAULT_NEARBY_RADIUS_METERS,
        }
    }

    pub fn with_min_serves(mut self, min_serves: i32) -> Self {
        self.min_serves = min_serves;
        self
    }
}

/// Donation service trait for dependency injection.
#[async_trait]
pub trait DonationService: Send + Sync {
    /// Post a new donation (donor only); starts Available and unassigned
    async fn create_donation(&self, actor: Actor, fields: DonationFields) -> AppResult<Donation>;

    /// Replace the listing fields of an Available donation (owning donor only)
    async fn edit_donation(
        &self,
        actor: Actor,
        id: Uuid,
        fields: DonationFields,
    ) -> AppResult<Donation>;

    /// Claim an Available donation for pickup (volunteer only)
    async fn accept_donation(&self, actor: Actor, id: Uuid) -> AppResult<Donation>;

    /// Give a claimed donation back (assigned volunteer only)
    async fn reject_donation(&self, actor: Actor, id: Uuid) -> AppResult<Donation>;

    /// Mark a claimed donation delivered (assigned volunteer only)
    async fn complete_donation(&self, actor: Actor, id: Uuid) -> AppResult<Donation>;

    /// Fetch a single donation by id
    async fn get_donation(&self, id: Uuid) -> AppResult<Donation>;

    /// Donations posted by a donor, newest first
    async fn list_donations_by_donor(&self, donor_id: Uuid) -> AppResult<Vec<Donation>>;

    /// Donations assigned to a volunteer, most recently updated first
    async fn list_donations_by_volunteer(&self, volunteer_id: Uuid) -> AppResult<Vec<Donation>>;

    /// Ranked nearby donations with donor info attached and secrets stripped
    async fn find_nearby_donations(&self, query: NearbyQuery) -> AppResult<Vec<NearbyDonation>>;
}

/// Concrete implementation of `DonationService`.
///
/// Store handles are injected; the engine holds no state of its own.
pub struct DonationCoordinator {
    donations: Arc<dyn DonationRepository>,
    users: Arc<dyn UserRepository>,
}

impl DonationCoordinator {
    pub fn new(donations: Arc<dyn DonationRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { donations, users }
    }

    /// Validate listing fields before any store call touches the row.
    fn validate_fields(fields: &DonationFields, now: DateTime<Utc>) -> AppResult<()> {
        validate::food_items(&fields.food_items)?;
        validate::serves(fields.serves)?;
        validate::pickup_deadline(fields.pickup_by, now)?;
        validate::location(&fields.location)
    }

    /// Shared read-validate-write loop for all lifecycle transitions.
    ///
    /// `check` inspects the freshly read donation and either rejects the
    /// transition or yields the conditional write to attempt. A write lost
    /// to a concurrent actor is retried from a fresh read (which re-runs
    /// `check` against the new state) up to `CAS_RETRIES` times; after that
    /// the conflict surfaces as `InvalidState`.
    async fn transition<F>(&self, id: Uuid, check: F) -> AppResult<Donation>
    where
        F: Fn(&Donation) -> AppResult<(DonationPredicate, DonationPatch)> + Send + Sync,
    {
        let mut attempts = 0;
        loop {
            let donation = self
                .donations
                .find_by_id(id)
                .await?
                .ok_or(AppError::NotFound)?;

            let (predicate, patch) = check(&donation)?;

            match self.donations.update_where(id, predicate, patch).await {
                Err(AppError::PreconditionFailed) if attempts < CAS_RETRIES => {
                    attempts += 1;
                }
                Err(AppError::PreconditionFailed) => {
                    return Err(AppError::invalid_state(
                        "donation was modified concurrently",
                    ));
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl DonationService for DonationCoordinator {
    async fn create_donation(&self, actor: Actor, fields: DonationFields) -> AppResult<Donation> {
        actor.require_donor()?;
        Self::validate_fields(&fields, Utc::now())?;

        self.donations
            .insert(NewDonation {
                donor_id: actor.id,
                food_items: fields.food_items,
                serves: fields.serves,
                pickup_by: fields.pickup_by,
                location: fields.location,
            })
            .await
    }

    async fn edit_donation(
        &self,
        actor: Actor,
        id: Uuid,
        fields: DonationFields,
    ) -> AppResult<Donation> {
        Self::validate_fields(&fields, Utc::now())?;

        self.transition(id, move |donation| {
            if donation.donor_id != actor.id {
                return Err(AppError::Forbidden);
            }
            if donation.status != DonationStatus::Available {
                return Err(AppError::invalid_state(
                    "cannot edit a donation that has been accepted",
                ));
            }
            Ok((
                DonationPredicate::status_is(DonationStatus::Available),
                DonationPatch {
                    food_items: Some(fields.food_items.clone()),
                    serves: Some(fields.serves),
                    pickup_by: Some(fields.pickup_by),
                    location: Some(fields.location),
                    ..Default::default()
                },
            ))
        })
        .await
    }

    async fn accept_donation(&self, actor: Actor, id: Uuid) -> AppResult<Donation> {
        actor.require_volunteer()?;

        self.transition(id, move |donation| {
            // Also the losing side of a concurrent accept: the fresh read
            // shows the winner's claim and lands here.
            if donation.status != DonationStatus::Available {
                return Err(AppError::invalid_state("donation is no longer available"));
            }
            Ok((
                DonationPredicate::status_is(DonationStatus::Available),
                DonationPatch {
                    status: Some(DonationStatus::PickupAccepted),
                    volunteer_id: Some(Some(actor.id)),
                    ..Default::default()
                },
            ))
        })
        .await
    }

    async fn reject_donation(&self, actor: Actor, id: Uuid) -> AppResult<Donation> {
        self.transition(id, move |donation| {
            if donation.volunteer_id != Some(actor.id) {
                return Err(AppError::Forbidden);
            }
            Ok((
                DonationPredicate::volunteer_is(actor.id),
                DonationPatch {
                    status: Some(DonationStatus::Available),
                    volunteer_id: Some(None),
                    ..Default::default()
                },
            ))
        })
        .await
    }

    async fn complete_donation(&self, actor: Actor, id: Uuid) -> AppResult<Donation> {
        self.transition(id, move |donation| {
            if donation.volunteer_id != Some(actor.id) {
                return Err(AppError::Forbidden);
            }
            Ok((
                DonationPredicate::volunteer_is(actor.id),
                DonationPatch {
                    status: Some(DonationStatus::Completed),
                    ..Default::default()
                },
            ))
        })
        .await
    }

    async fn get_donation(&self, id: Uuid) -> AppResult<Donation> {
        self.donations.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_donations_by_donor(&self, donor_id: Uuid) -> AppResult<Vec<Donation>> {
        self.donations.list_by_donor(donor_id).await
    }

    async fn list_donations_by_volunteer(&self, volunteer_id: Uuid) -> AppResult<Vec<Donation>> {
        self.donations.list_by_volunteer(volunteer_id).await
    }

    async fn find_nearby_donations(&self, query: NearbyQuery) -> AppResult<Vec<NearbyDonation>> {
        validate::location(&query.origin)?;
        let min_serves = query.min_serves.max(0);

        // Spatial range query first; the store returns candidates ordered by
        // distance with id as tiebreak, which this filter preserves.
        let candidates = self
            .donations
            .find_near(query.origin, query.max_distance_meters)
            .await?;

        let mut results = Vec::with_capacity(candidates.len());
        for (donation, distance_meters) in candidates {
            if !donation.status.is_active() || donation.serves < min_serves {
                continue;
            }

            // A donation whose donor is gone is a data-integrity gap; drop
            // it from the results rather than failing the whole search.
            let Some(donor) = self.users.find_by_id(donation.donor_id).await? else {
                continue;
            };

            results.push(NearbyDonation {
                donor: DonorSummary::from(donor),
                donation,
                distance_meters,
            });
        }

        Ok(results)
    }
}
