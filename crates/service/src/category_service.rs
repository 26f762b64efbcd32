use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::category;

use crate::errors::ServiceError;
use crate::ops::execute_transaction;
use crate::validate::ensure_vehicle_type;

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub vehicle_type: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
    #[serde(default)]
    pub is_popular: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub vehicle_type: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
    pub is_popular: Option<bool>,
}

fn to_active_model(input: CategoryInput) -> category::ActiveModel {
    category::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        vehicle_type: Set(input.vehicle_type),
        icon: Set(input.icon),
        display_order: Set(input.display_order),
        is_popular: Set(input.is_popular),
        ..Default::default()
    }
}

/// Create a single category.
pub async fn create_category(
    db: &DatabaseConnection,
    input: CategoryInput,
) -> Result<category::Model, ServiceError> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::Validation("name is required".to_string()));
    }
    if let Some(vehicle_type) = &input.vehicle_type {
        ensure_vehicle_type(vehicle_type)?;
    }
    let created = to_active_model(input).insert(db).await?;
    Ok(created)
}

/// Update a category by id, touching only the provided fields.
pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    patch: CategoryPatch,
) -> Result<category::Model, ServiceError> {
    if let Some(vehicle_type) = &patch.vehicle_type {
        ensure_vehicle_type(vehicle_type)?;
    }
    let mut am: category::ActiveModel = category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no category found with id: {id}")))?
        .into();
    if let Some(name) = patch.name {
        am.name = Set(name);
    }
    if let Some(description) = patch.description {
        am.description = Set(Some(description));
    }
    if let Some(vehicle_type) = patch.vehicle_type {
        am.vehicle_type = Set(Some(vehicle_type));
    }
    if let Some(icon) = patch.icon {
        am.icon = Set(Some(icon));
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

/// Delete a category by id; returns the deleted record.
pub async fn delete_category(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<category::Model, ServiceError> {
    let found = category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no category found with id: {id}")))?;
    category::Entity::delete_by_id(id).exec(db).await?;
    Ok(found)
}

/// Bulk-create categories in one transaction, skipping duplicates.
pub async fn bulk_create_categories(
    db: &DatabaseConnection,
    inputs: Vec<CategoryInput>,
) -> Result<u64, ServiceError> {
    if inputs.is_empty() {
        return Err(ServiceError::Validation(
            "request body must be a non-empty array of categories".to_string(),
        ));
    }
    for input in &inputs {
        if let Some(vehicle_type) = &input.vehicle_type {
            ensure_vehicle_type(vehicle_type)?;
        }
    }
    execute_transaction(db, move |txn| {
        Box::pin(async move {
            let records: Vec<_> = inputs.into_iter().map(to_active_model).collect();
            let inserted = category::Entity::insert_many(records)
                .on_conflict(OnConflict::new().do_nothing().to_owned())
                .exec_without_returning(txn)
                .await?;
            Ok(inserted)
        })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use migration::MigratorTrait;

    #[tokio::test]
    async fn category_crud_and_bulk() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        migration::Migrator::up(&db, None).await?;

        let name = format!("svc_cat_{}", Uuid::new_v4());
        let created = create_category(
            &db,
            CategoryInput {
                name: name.clone(),
                description: Some("General maintenance".into()),
                vehicle_type: Some("CAR".into()),
                icon: None,
                display_order: Some(1),
                is_popular: false,
            },
        )
        .await?;
        assert_eq!(created.name, name);

        let updated = update_category(
            &db,
            created.id,
            CategoryPatch { is_popular: Some(true), ..Default::default() },
        )
        .await?;
        assert!(updated.is_popular);

        // bulk insert skips the existing name
        let other = format!("svc_cat_{}", Uuid::new_v4());
        let count = bulk_create_categories(
            &db,
            vec![
                CategoryInput {
                    name: name.clone(),
                    description: None,
                    vehicle_type: None,
                    icon: None,
                    display_order: None,
                    is_popular: false,
                },
                CategoryInput {
                    name: other.clone(),
                    description: None,
                    vehicle_type: None,
                    icon: None,
                    display_order: None,
                    is_popular: false,
                },
            ],
        )
        .await?;
        assert_eq!(count, 1);

        let deleted = delete_category(&db, created.id).await?;
        assert_eq!(deleted.id, created.id);
        assert!(matches!(
            delete_category(&db, created.id).await,
            Err(ServiceError::NotFound(_))
        ));

        use sea_orm::{ColumnTrait, QueryFilter};
        category::Entity::delete_many()
            .filter(category::Column::Name.eq(other))
            .exec(&db)
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn rejects_invalid_vehicle_type() {
        // validation happens before any store access
        let err = ensure_vehicle_type("TRUCK").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
