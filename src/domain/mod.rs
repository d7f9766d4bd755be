//! Domain layer - Core business entities and logic
//!
//! The donation aggregate, user identity types, geographic primitives, and
//! the pure validation helpers the lifecycle engine runs before any store
//! mutation. Nothing in this module performs I/O.

pub mod donation;
pub mod geo;
pub mod password;
pub mod user;
pub mod validate;

pub use donation::{Donation, DonationStatus, FoodItem, NearbyDonation, NewDonation};
pub use geo::{BoundingBox, Point};
pub use password::Password;
pub use user::{Actor, DonorSummary, User, UserResponse, UserRole};
