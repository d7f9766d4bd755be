//! Migration: Create the donations table with position and lookup indexes.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .col(
                        ColumnDef::new(Donations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Donations::DonorId).uuid().not_null())
                    .col(ColumnDef::new(Donations::FoodItems).json_binary().not_null())
                    .col(ColumnDef::new(Donations::Serves).integer().not_null())
                    .col(
                        ColumnDef::new(Donations::PickupBy)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donations::Status).string().not_null())
                    .col(ColumnDef::new(Donations::Longitude).double().not_null())
                    .col(ColumnDef::new(Donations::Latitude).double().not_null())
                    .col(ColumnDef::new(Donations::VolunteerId).uuid().null())
                    .col(
                        ColumnDef::new(Donations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Donations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donations_donor")
                            .from(Donations::Table, Donations::DonorId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donations_volunteer")
                            .from(Donations::Table, Donations::VolunteerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Position index backing the bounding-box prefilter of the
        // proximity query
        manager
            .create_index(
                Index::create()
                    .name("idx_donations_position")
                    .table(Donations::Table)
                    .col(Donations::Latitude)
                    .col(Donations::Longitude)
                    .to_owned(),
            )
            .await?;

        // Indexes for the per-donor and per-volunteer listings
        manager
            .create_index(
                Index::create()
                    .name("idx_donations_donor_id")
                    .table(Donations::Table)
                    .col(Donations::DonorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_donations_volunteer_id")
                    .table(Donations::Table)
                    .col(Donations::VolunteerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Donations {
    Table,
    Id,
    DonorId,
    FoodItems,
    Serves,
    PickupBy,
    Status,
    Longitude,
    Latitude,
    VolunteerId,
    CreatedAt,
    UpdatedAt,
}
