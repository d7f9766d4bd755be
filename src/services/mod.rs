//! Services layer - Application use cases and business logic
//!
//! The donation lifecycle engine and proximity matcher, the auth service,
//! and the container that wires them to their stores.

pub mod auth_service;
pub mod container;
pub mod donation_service;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use container::{ServiceContainer, Services};
pub use donation_service::{
    DonationCoordinator, DonationFields, DonationService, NearbyQuery,
};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
