use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::service_type;

use crate::errors::ServiceError;
use crate::ops::execute_transaction;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceTypeInput {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub estimated_duration: Option<i32>,
    pub display_image: Option<String>,
    pub recommended_frequency: Option<String>,
    pub warning_threshold: Option<i32>,
    pub display_order: Option<i32>,
    #[serde(default)]
    pub is_popular: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceTypePatch {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub estimated_duration: Option<i32>,
    pub display_image: Option<String>,
    pub recommended_frequency: Option<String>,
    pub warning_threshold: Option<i32>,
    pub display_order: Option<i32>,
    pub is_popular: Option<bool>,
}

fn to_active_model(input: ServiceTypeInput) -> service_type::ActiveModel {
    service_type::ActiveModel {
        category_id: Set(input.category_id),
        name: Set(input.name),
        description: Set(input.description),
        long_description: Set(input.long_description),
        estimated_duration: Set(input.estimated_duration),
        display_image: Set(input.display_image),
        recommended_frequency: Set(input.recommended_frequency),
        warning_threshold: Set(input.warning_threshold),
        display_order: Set(input.display_order),
        is_popular: Set(input.is_popular),
        ..Default::default()
    }
}

/// Create a single service type.
pub async fn create_type(
    db: &DatabaseConnection,
    input: ServiceTypeInput,
) -> Result<service_type::Model, ServiceError> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::Validation("name is required".to_string()));
    }
    let created = to_active_model(input).insert(db).await?;
    Ok(created)
}

/// Update a service type by id, touching only the provided fields.
pub async fn update_type(
    db: &DatabaseConnection,
    id: Uuid,
    patch: ServiceTypePatch,
) -> Result<service_type::Model, ServiceError> {
    let mut am: service_type::ActiveModel = service_type::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no service type found with id: {id}")))?
        .into();
    if let Some(category_id) = patch.category_id {
        am.category_id = Set(category_id);
    }
    if let Some(name) = patch.name {
        am.name = Set(name);
    }
    if let Some(description) = patch.description {
        am.description = Set(Some(description));
    }
    if let Some(long_description) = patch.long_description {
        am.long_description = Set(Some(long_description));
    }
    if let Some(estimated_duration) = patch.estimated_duration {
        am.estimated_duration = Set(Some(estimated_duration));
    }
    if let Some(display_image) = patch.display_image {
        am.display_image = Set(Some(display_image));
    }
    if let Some(recommended_frequency) = patch.recommended_frequency {
        am.recommended_frequency = Set(Some(recommended_frequency));
    }
    if let Some(warning_threshold) = patch.warning_threshold {
        am.warning_threshold = Set(Some(warning_threshold));
    }
    if let Some(display_order) = patch.display_order {
        am.display_order = Set(Some(display_order));
    }
    if let Some(is_popular) = patch.is_popular {
        am.is_popular = Set(is_popular);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

/// Delete a service type by id; returns the deleted record.
pub async fn delete_type(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<service_type::Model, ServiceError> {
    let found = service_type::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no service type found with id: {id}")))?;
    service_type::Entity::delete_by_id(id).exec(db).await?;
    Ok(found)
}

/// Bulk-create service types in one transaction, skipping duplicates.
pub async fn bulk_create_types(
    db: &DatabaseConnection,
    inputs: Vec<ServiceTypeInput>,
) -> Result<u64, ServiceError> {
    if inputs.is_empty() {
        return Err(ServiceError::Validation(
            "request body must be a non-empty array of service types".to_string(),
        ));
    }
    execute_transaction(db, move |txn| {
        Box::pin(async move {
            let records: Vec<_> = inputs.into_iter().map(to_active_model).collect();
            let inserted = service_type::Entity::insert_many(records)
                .on_conflict(OnConflict::new().do_nothing().to_owned())
                .exec_without_returning(txn)
                .await?;
            Ok(inserted)
        })
    })
    .await
}
