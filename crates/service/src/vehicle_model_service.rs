use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::vehicle_model;

use crate::errors::ServiceError;
use crate::validate::ensure_vehicle_type;

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleModelInput {
    pub brand_id: Uuid,
    pub name: String,
    pub vehicle_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VehicleModelPatch {
    pub brand_id: Option<Uuid>,
    pub name: Option<String>,
    pub vehicle_type: Option<String>,
}

/// Create a vehicle model under a brand.
pub async fn create_model(
    db: &DatabaseConnection,
    input: VehicleModelInput,
) -> Result<vehicle_model::Model, ServiceError> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::Validation("name is required".to_string()));
    }
    if let Some(vehicle_type) = &input.vehicle_type {
        ensure_vehicle_type(vehicle_type)?;
    }
    let am = vehicle_model::ActiveModel {
        brand_id: Set(input.brand_id),
        name: Set(input.name),
        vehicle_type: Set(input.vehicle_type),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

/// Update a vehicle model by id.
pub async fn update_model(
    db: &DatabaseConnection,
    id: Uuid,
    patch: VehicleModelPatch,
) -> Result<vehicle_model::Model, ServiceError> {
    if let Some(vehicle_type) = &patch.vehicle_type {
        ensure_vehicle_type(vehicle_type)?;
    }
    let mut am: vehicle_model::ActiveModel = vehicle_model::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no model found with id: {id}")))?
        .into();
    if let Some(brand_id) = patch.brand_id {
        am.brand_id = Set(brand_id);
    }
    if let Some(name) = patch.name {
        am.name = Set(name);
    }
    if let Some(vehicle_type) = patch.vehicle_type {
        am.vehicle_type = Set(Some(vehicle_type));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

/// Delete a vehicle model by id; returns the deleted record.
pub async fn delete_model(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<vehicle_model::Model, ServiceError> {
    let found = vehicle_model::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no model found with id: {id}")))?;
    vehicle_model::Entity::delete_by_id(id).exec(db).await?;
    Ok(found)
}
