//! Create `operating_hour` table; one row per center per weekday.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OperatingHour::Table)
                    .if_not_exists()
                    .col(
                        uuid(OperatingHour::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(uuid(OperatingHour::ServiceCenterId).not_null())
                    .col(integer(OperatingHour::DayOfWeek).not_null())
                    .col(time_null(OperatingHour::OpenTime))
                    .col(time_null(OperatingHour::CloseTime))
                    .col(boolean(OperatingHour::IsClosed).default(false))
                    .col(
                        timestamp_with_time_zone(OperatingHour::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(OperatingHour::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_operating_hour_service_center")
                            .from(OperatingHour::Table, OperatingHour::ServiceCenterId)
                            .to(ServiceCenter::Table, ServiceCenter::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_operating_hour_center_day")
                    .table(OperatingHour::Table)
                    .col(OperatingHour::ServiceCenterId)
                    .col(OperatingHour::DayOfWeek)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OperatingHour::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OperatingHour {
    Table,
    Id,
    ServiceCenterId,
    DayOfWeek,
    OpenTime,
    CloseTime,
    IsClosed,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ServiceCenter {
    Table,
    Id,
}
