//! SeaORM entity for the donations table.

use sea_orm::entity::prelude::*;

use crate::domain::{Donation, Point};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub donor_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub food_items: Json,
    pub serves: i32,
    pub pickup_by: DateTimeUtc,
    pub status: String,
    pub longitude: f64,
    pub latitude: f64,
    pub volunteer_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Donation {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = model.status.parse().map_err(|_| {
            AppError::internal(format!("unknown status in donations row: {}", model.status))
        })?;

        let food_items = serde_json::from_value(model.food_items)
            .map_err(|e| AppError::internal(format!("malformed food_items column: {}", e)))?;

        Ok(Donation {
            id: model.id,
            donor_id: model.donor_id,
            food_items,
            serves: model.serves,
            pickup_by: model.pickup_by,
            status,
            location: Point::new(model.longitude, model.latitude),
            volunteer_id: model.volunteer_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
