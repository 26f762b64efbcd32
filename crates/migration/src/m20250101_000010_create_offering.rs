//! Create `service_center_offering` table linking centers to service types.
//!
//! One offering per (center, type) pair; base_price is computed from
//! component costs when the caller does not provide one.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceCenterOffering::Table)
                    .if_not_exists()
                    .col(
                        uuid(ServiceCenterOffering::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(uuid(ServiceCenterOffering::ServiceCenterId).not_null())
                    .col(uuid(ServiceCenterOffering::ServiceTypeId).not_null())
                    .col(string_len(ServiceCenterOffering::Status, 32).default("ACTIVE"))
                    .col(double(ServiceCenterOffering::BasePrice).not_null())
                    .col(double_null(ServiceCenterOffering::DiscountPercentage))
                    .col(timestamp_with_time_zone_null(ServiceCenterOffering::DiscountValidUntil))
                    .col(integer_null(ServiceCenterOffering::TimeToComplete))
                    .col(
                        json_binary(ServiceCenterOffering::AvailablePriorities)
                            .default(Expr::cust("'[\"NORMAL\"]'::jsonb")),
                    )
                    .col(
                        json_binary(ServiceCenterOffering::PriorityPrices)
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(integer_null(ServiceCenterOffering::MinimumAdvanceBooking))
                    .col(text_null(ServiceCenterOffering::TermsAndConditions))
                    .col(
                        string_len(ServiceCenterOffering::PaymentPolicy, 64)
                            .default("PAYMENT_AFTER_SERVICE"),
                    )
                    .col(integer_null(ServiceCenterOffering::WarrantyDays))
                    .col(integer_null(ServiceCenterOffering::WarrantyKilometers))
                    .col(boolean(ServiceCenterOffering::IsHighlighted).default(false))
                    .col(boolean(ServiceCenterOffering::HasEmergencyService).default(false))
                    .col(double_null(ServiceCenterOffering::EmergencyServiceFee))
                    .col(
                        timestamp_with_time_zone(ServiceCenterOffering::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ServiceCenterOffering::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offering_service_center")
                            .from(
                                ServiceCenterOffering::Table,
                                ServiceCenterOffering::ServiceCenterId,
                            )
                            .to(ServiceCenter::Table, ServiceCenter::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offering_service_type")
                            .from(
                                ServiceCenterOffering::Table,
                                ServiceCenterOffering::ServiceTypeId,
                            )
                            .to(ServiceType::Table, ServiceType::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_offering_center_type")
                    .table(ServiceCenterOffering::Table)
                    .col(ServiceCenterOffering::ServiceCenterId)
                    .col(ServiceCenterOffering::ServiceTypeId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceCenterOffering::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceCenterOffering {
    Table,
    Id,
    ServiceCenterId,
    ServiceTypeId,
    Status,
    BasePrice,
    DiscountPercentage,
    DiscountValidUntil,
    TimeToComplete,
    AvailablePriorities,
    PriorityPrices,
    MinimumAdvanceBooking,
    TermsAndConditions,
    PaymentPolicy,
    WarrantyDays,
    WarrantyKilometers,
    IsHighlighted,
    HasEmergencyService,
    EmergencyServiceFee,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ServiceCenter {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ServiceType {
    Table,
    Id,
}
