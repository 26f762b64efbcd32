//! Create `service_category` table.
//!
//! Top level of the service catalog; names are unique so bulk imports can
//! skip duplicates.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceCategory::Table)
                    .if_not_exists()
                    .col(
                        uuid(ServiceCategory::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(string_len(ServiceCategory::Name, 128).unique_key().not_null())
                    .col(text_null(ServiceCategory::Description))
                    .col(string_len_null(ServiceCategory::VehicleType, 16))
                    .col(string_len_null(ServiceCategory::Icon, 255))
                    .col(integer_null(ServiceCategory::DisplayOrder))
                    .col(boolean(ServiceCategory::IsPopular).default(false))
                    .col(
                        timestamp_with_time_zone(ServiceCategory::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ServiceCategory::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceCategory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceCategory {
    Table,
    Id,
    Name,
    Description,
    VehicleType,
    Icon,
    DisplayOrder,
    IsPopular,
    CreatedAt,
    UpdatedAt,
}
