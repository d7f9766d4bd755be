//! User repository - Identity store access.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::user::{ActiveModel, Column, Entity as UserEntity};
use crate::domain::{Point, User, UserRole};
use crate::errors::AppResult;

/// Identity store consumed by the donation engine and the auth service.
///
/// The engine only ever reads from it; `create` exists for registration.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up a user by id
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Look up a user by phone number (unique)
    async fn find_by_phone(&self, phone_number: &str) -> AppResult<Option<User>>;

    /// Create a new user record
    async fn create(
        &self,
        full_name: String,
        phone_number: String,
        password_hash: String,
        role: UserRole,
        location: Option<Point>,
    ) -> AppResult<User>;
}

/// SeaORM-backed implementation of `UserRepository`.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let model = UserEntity::find_by_id(id).one(&self.db).await?;
        model.map(User::try_from).transpose()
    }

    async fn find_by_phone(&self, phone_number: &str) -> AppResult<Option<User>> {
        let model = UserEntity::find()
            .filter(Column::PhoneNumber.eq(phone_number))
            .one(&self.db)
            .await?;
        model.map(User::try_from).transpose()
    }

    async fn create(
        &self,
        full_name: String,
        phone_number: String,
        password_hash: String,
        role: UserRole,
        location: Option<Point>,
    ) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(full_name),
            phone_number: Set(phone_number),
            password_hash: Set(password_hash),
            role: Set(role.to_string()),
            longitude: Set(location.map(|p| p.longitude)),
            latitude: Set(location.map(|p| p.latitude)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        User::try_from(model)
    }
}
