//! Infrastructure layer - External systems integration
//!
//! Database connections, migrations, and the repositories that back the
//! identity and donation stores.

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{
    DonationPatch, DonationPredicate, DonationRepository, DonationStore, UserRepository, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockDonationRepository, MockUserRepository};
