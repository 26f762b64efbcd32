//! Create `service_type` table with FK to `service_category`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceType::Table)
                    .if_not_exists()
                    .col(
                        uuid(ServiceType::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(uuid(ServiceType::CategoryId).not_null())
                    .col(string_len(ServiceType::Name, 128).unique_key().not_null())
                    .col(text_null(ServiceType::Description))
                    .col(text_null(ServiceType::LongDescription))
                    .col(integer_null(ServiceType::EstimatedDuration))
                    .col(string_len_null(ServiceType::DisplayImage, 255))
                    .col(string_len_null(ServiceType::RecommendedFrequency, 128))
                    .col(integer_null(ServiceType::WarningThreshold))
                    .col(integer_null(ServiceType::DisplayOrder))
                    .col(boolean(ServiceType::IsPopular).default(false))
                    .col(
                        timestamp_with_time_zone(ServiceType::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ServiceType::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_type_category")
                            .from(ServiceType::Table, ServiceType::CategoryId)
                            .to(ServiceCategory::Table, ServiceCategory::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceType::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceType {
    Table,
    Id,
    CategoryId,
    Name,
    Description,
    LongDescription,
    EstimatedDuration,
    DisplayImage,
    RecommendedFrequency,
    WarningThreshold,
    DisplayOrder,
    IsPopular,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ServiceCategory {
    Table,
    Id,
}
