//! SeaORM entity for the users table.

use sea_orm::entity::prelude::*;

use crate::domain::{Point, User};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    #[sea_orm(unique)]
    pub phone_number: String,
    pub password_hash: String,
    pub role: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role = model
            .role
            .parse()
            .map_err(|_| AppError::internal(format!("unknown role in users row: {}", model.role)))?;

        // A row may only carry a location when both coordinates are present.
        let location = match (model.longitude, model.latitude) {
            (Some(longitude), Some(latitude)) => Some(Point::new(longitude, latitude)),
            _ => None,
        };

        Ok(User {
            id: model.id,
            full_name: model.full_name,
            phone_number: model.phone_number,
            password_hash: model.password_hash,
            role,
            location,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
