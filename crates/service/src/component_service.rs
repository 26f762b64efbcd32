use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::component;

use crate::errors::ServiceError;
use crate::validate::{ensure_positive_duration, ensure_vehicle_type};

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentInput {
    pub service_type_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub vehicle_type: String,
    pub estimated_duration: i32,
    #[serde(default)]
    pub cost: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ComponentPatch {
    pub service_type_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub vehicle_type: Option<String>,
    pub estimated_duration: Option<i32>,
    pub cost: Option<f64>,
}

/// Create a service component.
pub async fn create_component(
    db: &DatabaseConnection,
    input: ComponentInput,
) -> Result<component::Model, ServiceError> {
    ensure_positive_duration(input.estimated_duration)?;
    ensure_vehicle_type(&input.vehicle_type)?;
    let am = component::ActiveModel {
        service_type_id: Set(input.service_type_id),
        name: Set(input.name),
        description: Set(input.description),
        vehicle_type: Set(input.vehicle_type),
        estimated_duration: Set(input.estimated_duration),
        cost: Set(input.cost),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

/// Update a component by id; validates only the fields included.
pub async fn update_component(
    db: &DatabaseConnection,
    id: Uuid,
    patch: ComponentPatch,
) -> Result<component::Model, ServiceError> {
    if let Some(estimated_duration) = patch.estimated_duration {
        ensure_positive_duration(estimated_duration)?;
    }
    if let Some(vehicle_type) = &patch.vehicle_type {
        ensure_vehicle_type(vehicle_type)?;
    }
    let mut am: component::ActiveModel = component::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("component not found".to_string()))?
        .into();
    if let Some(service_type_id) = patch.service_type_id {
        am.service_type_id = Set(Some(service_type_id));
    }
    if let Some(name) = patch.name {
        am.name = Set(name);
    }
    if let Some(description) = patch.description {
        am.description = Set(Some(description));
    }
    if let Some(vehicle_type) = patch.vehicle_type {
        am.vehicle_type = Set(vehicle_type);
    }
    if let Some(estimated_duration) = patch.estimated_duration {
        am.estimated_duration = Set(estimated_duration);
    }
    if let Some(cost) = patch.cost {
        am.cost = Set(cost);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

/// Delete a component by id; returns the deleted record.
pub async fn delete_component(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<component::Model, ServiceError> {
    let found = component::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("component not found".to_string()))?;
    component::Entity::delete_by_id(id).exec(db).await?;
    Ok(found)
}
