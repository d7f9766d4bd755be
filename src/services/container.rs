//! Service container - Centralized service construction and access.
//!
//! Wires repositories into services once at startup; everything downstream
//! receives trait objects, never concrete store types.

use std::sync::Arc;

use super::{AuthService, Authenticator, DonationCoordinator, DonationService};
use crate::config::Config;
use crate::infra::{DonationStore, UserStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get donation service
    fn donations(&self) -> Arc<dyn DonationService>;
}

/// Concrete implementation of `ServiceContainer`.
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    donation_service: Arc<dyn DonationService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        donation_service: Arc<dyn DonationService>,
    ) -> Self {
        Self {
            auth_service,
            donation_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let donations = Arc::new(DonationStore::new(db));

        let auth_service = Arc::new(Authenticator::new(users.clone(), config));
        let donation_service = Arc::new(DonationCoordinator::new(donations, users));

        Self {
            auth_service,
            donation_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn donations(&self) -> Arc<dyn DonationService> {
        self.donation_service.clone()
    }
}
