//! Create `service_component` table.
//!
//! Components optionally belong to a service type; their costs feed the
//! offering base-price aggregation.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceComponent::Table)
                    .if_not_exists()
                    .col(
                        uuid(ServiceComponent::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(uuid_null(ServiceComponent::ServiceTypeId))
                    .col(string_len(ServiceComponent::Name, 128).unique_key().not_null())
                    .col(text_null(ServiceComponent::Description))
                    .col(string_len(ServiceComponent::VehicleType, 16).not_null())
                    .col(integer(ServiceComponent::EstimatedDuration).not_null())
                    .col(double(ServiceComponent::Cost).default(0.0))
                    .col(
                        timestamp_with_time_zone(ServiceComponent::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ServiceComponent::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_component_type")
                            .from(ServiceComponent::Table, ServiceComponent::ServiceTypeId)
                            .to(ServiceType::Table, ServiceType::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceComponent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceComponent {
    Table,
    Id,
    ServiceTypeId,
    Name,
    Description,
    VehicleType,
    EstimatedDuration,
    Cost,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ServiceType {
    Table,
    Id,
}
