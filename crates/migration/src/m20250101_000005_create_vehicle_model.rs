//! Create `vehicle_model` table with FK to `brand`.
//!
//! Model names are unique per brand, not globally.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VehicleModel::Table)
                    .if_not_exists()
                    .col(
                        uuid(VehicleModel::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(uuid(VehicleModel::BrandId).not_null())
                    .col(string_len(VehicleModel::Name, 128).not_null())
                    .col(string_len_null(VehicleModel::VehicleType, 16))
                    .col(
                        timestamp_with_time_zone(VehicleModel::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(VehicleModel::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicle_model_brand")
                            .from(VehicleModel::Table, VehicleModel::BrandId)
                            .to(Brand::Table, Brand::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_vehicle_model_brand_name")
                    .table(VehicleModel::Table)
                    .col(VehicleModel::BrandId)
                    .col(VehicleModel::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VehicleModel::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VehicleModel {
    Table,
    Id,
    BrandId,
    Name,
    VehicleType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Brand {
    Table,
    Id,
}
