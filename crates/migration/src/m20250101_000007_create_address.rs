//! Create `address` table; one address per service center.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Address::Table)
                    .if_not_exists()
                    .col(
                        uuid(Address::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(uuid(Address::ServiceCenterId).unique_key().not_null())
                    .col(string_len(Address::Line1, 255).not_null())
                    .col(string_len_null(Address::Line2, 255))
                    .col(string_len(Address::City, 128).not_null())
                    .col(string_len_null(Address::State, 128))
                    .col(string_len_null(Address::PostalCode, 32))
                    .col(string_len_null(Address::Country, 128))
                    .col(double_null(Address::Latitude))
                    .col(double_null(Address::Longitude))
                    .col(
                        timestamp_with_time_zone(Address::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Address::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_service_center")
                            .from(Address::Table, Address::ServiceCenterId)
                            .to(ServiceCenter::Table, ServiceCenter::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Address::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Address {
    Table,
    Id,
    ServiceCenterId,
    Line1,
    Line2,
    City,
    State,
    PostalCode,
    Country,
    Latitude,
    Longitude,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ServiceCenter {
    Table,
    Id,
}
