use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ServiceType: index on category_id
        manager
            .create_index(
                Index::create()
                    .name("idx_service_type_category")
                    .table(ServiceType::Table)
                    .col(ServiceType::CategoryId)
                    .to_owned(),
            )
            .await?;

        // ServiceComponent: index on service_type_id
        manager
            .create_index(
                Index::create()
                    .name("idx_service_component_type")
                    .table(ServiceComponent::Table)
                    .col(ServiceComponent::ServiceTypeId)
                    .to_owned(),
            )
            .await?;

        // VehicleModel: index on brand_id
        manager
            .create_index(
                Index::create()
                    .name("idx_vehicle_model_brand")
                    .table(VehicleModel::Table)
                    .col(VehicleModel::BrandId)
                    .to_owned(),
            )
            .await?;

        // OperatingHour: index on service_center_id
        manager
            .create_index(
                Index::create()
                    .name("idx_operating_hour_center")
                    .table(OperatingHour::Table)
                    .col(OperatingHour::ServiceCenterId)
                    .to_owned(),
            )
            .await?;

        // Slot: composite index on (service_center_id, slot_date)
        manager
            .create_index(
                Index::create()
                    .name("idx_slot_center_date")
                    .table(Slot::Table)
                    .col(Slot::ServiceCenterId)
                    .col(Slot::SlotDate)
                    .to_owned(),
            )
            .await?;

        // Offering: index on service_center_id
        manager
            .create_index(
                Index::create()
                    .name("idx_offering_center")
                    .table(ServiceCenterOffering::Table)
                    .col(ServiceCenterOffering::ServiceCenterId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_service_type_category")
                    .table(ServiceType::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_service_component_type")
                    .table(ServiceComponent::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_vehicle_model_brand")
                    .table(VehicleModel::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_operating_hour_center")
                    .table(OperatingHour::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("idx_slot_center_date").table(Slot::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_offering_center")
                    .table(ServiceCenterOffering::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceType {
    Table,
    CategoryId,
}

#[derive(DeriveIden)]
enum ServiceComponent {
    Table,
    ServiceTypeId,
}

#[derive(DeriveIden)]
enum VehicleModel {
    Table,
    BrandId,
}

#[derive(DeriveIden)]
enum OperatingHour {
    Table,
    ServiceCenterId,
}

#[derive(DeriveIden)]
enum Slot {
    Table,
    ServiceCenterId,
    SlotDate,
}

#[derive(DeriveIden)]
enum ServiceCenterOffering {
    Table,
    ServiceCenterId,
}
