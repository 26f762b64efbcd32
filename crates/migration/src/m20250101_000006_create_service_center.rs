//! Create `service_center` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceCenter::Table)
                    .if_not_exists()
                    .col(
                        uuid(ServiceCenter::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(string_len(ServiceCenter::Name, 255).not_null())
                    .col(string_len(ServiceCenter::Status, 32).default("ACTIVE"))
                    .col(string_len_null(ServiceCenter::Phone, 32))
                    .col(string_len_null(ServiceCenter::Email, 255))
                    .col(text_null(ServiceCenter::Description))
                    .col(
                        timestamp_with_time_zone(ServiceCenter::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ServiceCenter::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceCenter::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceCenter {
    Table,
    Id,
    Name,
    Status,
    Phone,
    Email,
    Description,
    CreatedAt,
    UpdatedAt,
}
