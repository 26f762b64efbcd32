use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::brand;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct BrandInput {
    pub name: String,
    pub logo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BrandPatch {
    pub name: Option<String>,
    pub logo: Option<String>,
}

/// Create a brand.
pub async fn create_brand(
    db: &DatabaseConnection,
    input: BrandInput,
) -> Result<brand::Model, ServiceError> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::Validation("name is required".to_string()));
    }
    let am = brand::ActiveModel {
        name: Set(input.name),
        logo: Set(input.logo),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

/// Update a brand by id. Renames are checked against other brands first so
/// the caller gets a clear message instead of a bare constraint error.
pub async fn update_brand(
    db: &DatabaseConnection,
    id: Uuid,
    patch: BrandPatch,
) -> Result<brand::Model, ServiceError> {
    let found = brand::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no brand found with id: {id}")))?;

    if let Some(name) = &patch.name {
        if *name != found.name {
            let taken = brand::Entity::find()
                .filter(brand::Column::Name.eq(name.clone()))
                .filter(brand::Column::Id.ne(id))
                .one(db)
                .await?;
            if taken.is_some() {
                return Err(ServiceError::Validation(format!(
                    "a brand with name \"{name}\" already exists"
                )));
            }
        }
    }

    let mut am: brand::ActiveModel = found.into();
    if let Some(name) = patch.name {
        am.name = Set(name);
    }
    if let Some(logo) = patch.logo {
        am.logo = Set(Some(logo));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

/// Delete a brand by id; returns the deleted record.
pub async fn delete_brand(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<brand::Model, ServiceError> {
    let found = brand::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no brand found with id: {id}")))?;
    brand::Entity::delete_by_id(id).exec(db).await?;
    Ok(found)
}
