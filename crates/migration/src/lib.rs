//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_service_category;
mod m20250101_000002_create_service_type;
mod m20250101_000003_create_service_component;
mod m20250101_000004_create_brand;
mod m20250101_000005_create_vehicle_model;
mod m20250101_000006_create_service_center;
mod m20250101_000007_create_address;
mod m20250101_000008_create_operating_hour;
mod m20250101_000009_create_slot;
mod m20250101_000010_create_offering;
mod m20250101_000011_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_service_category::Migration),
            Box::new(m20250101_000002_create_service_type::Migration),
            Box::new(m20250101_000003_create_service_component::Migration),
            Box::new(m20250101_000004_create_brand::Migration),
            Box::new(m20250101_000005_create_vehicle_model::Migration),
            Box::new(m20250101_000006_create_service_center::Migration),
            Box::new(m20250101_000007_create_address::Migration),
            Box::new(m20250101_000008_create_operating_hour::Migration),
            Box::new(m20250101_000009_create_slot::Migration),
            Box::new(m20250101_000010_create_offering::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000011_add_indexes::Migration),
        ]
    }
}
