//! Create `slot` table for bookable time windows at a service center.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Slot::Table)
                    .if_not_exists()
                    .col(
                        uuid(Slot::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(uuid(Slot::ServiceCenterId).not_null())
                    .col(date(Slot::SlotDate).not_null())
                    .col(time(Slot::StartTime).not_null())
                    .col(time(Slot::EndTime).not_null())
                    .col(integer(Slot::Capacity).default(1))
                    .col(integer(Slot::BookedCount).default(0))
                    .col(string_len(Slot::Status, 32).default("AVAILABLE"))
                    .col(
                        timestamp_with_time_zone(Slot::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Slot::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_slot_service_center")
                            .from(Slot::Table, Slot::ServiceCenterId)
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
                    .name("uniq_slot_center_date_start")
                    .table(Slot::Table)
                    .col(Slot::ServiceCenterId)
                    .col(Slot::SlotDate)
                    .col(Slot::StartTime)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Slot::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Slot {
    Table,
    Id,
    ServiceCenterId,
    SlotDate,
    StartTime,
    EndTime,
    Capacity,
    BookedCount,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ServiceCenter {
    Table,
    Id,
}
