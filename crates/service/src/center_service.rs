use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use models::{offering, service_center};

use crate::errors::ServiceError;
use crate::pricing::{self, ComponentCatalog};

#[derive(Debug, Clone, Deserialize)]
pub struct CenterInput {
    pub name: String,
    pub status: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CenterPatch {
    pub name: Option<String>,
    pub status: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
}

/// Create a service center.
pub async fn create_center(
    db: &DatabaseConnection,
    input: CenterInput,
) -> Result<service_center::Model, ServiceError> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::Validation("name is required".to_string()));
    }
    let am = service_center::ActiveModel {
        name: Set(input.name),
        status: Set(input.status.unwrap_or_else(|| "ACTIVE".to_string())),
        phone: Set(input.phone),
        email: Set(input.email),
        description: Set(input.description),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

/// Update a service center by id.
pub async fn update_center(
    db: &DatabaseConnection,
    id: Uuid,
    patch: CenterPatch,
) -> Result<service_center::Model, ServiceError> {
    let mut am: service_center::ActiveModel = service_center::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no service center found with id: {id}")))?
        .into();
    if let Some(name) = patch.name {
        am.name = Set(name);
    }
    if let Some(status) = patch.status {
        am.status = Set(status);
    }
    if let Some(phone) = patch.phone {
        am.phone = Set(Some(phone));
    }
    if let Some(email) = patch.email {
        am.email = Set(Some(email));
    }
    if let Some(description) = patch.description {
        am.description = Set(Some(description));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

/// Delete a service center by id; returns the deleted record.
pub async fn delete_center(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<service_center::Model, ServiceError> {
    let found = service_center::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no service center found with id: {id}")))?;
    service_center::Entity::delete_by_id(id).exec(db).await?;
    Ok(found)
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferingInput {
    pub service_type_id: Uuid,
    pub status: Option<String>,
    pub base_price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub discount_valid_until: Option<DateTime<FixedOffset>>,
    pub time_to_complete: Option<i32>,
    pub available_priorities: Option<Value>,
    pub priority_prices: Option<Value>,
    pub minimum_advance_booking: Option<i32>,
    pub terms_and_conditions: Option<String>,
    pub payment_policy: Option<String>,
    pub warranty_days: Option<i32>,
    pub warranty_kilometers: Option<i32>,
    #[serde(default)]
    pub is_highlighted: bool,
    #[serde(default)]
    pub has_emergency_service: bool,
    pub emergency_service_fee: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OfferingPatch {
    pub service_type_id: Option<Uuid>,
    pub status: Option<String>,
    pub base_price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub discount_valid_until: Option<DateTime<FixedOffset>>,
    pub time_to_complete: Option<i32>,
    pub available_priorities: Option<Value>,
    pub priority_prices: Option<Value>,
    pub minimum_advance_booking: Option<i32>,
    pub terms_and_conditions: Option<String>,
    pub payment_policy: Option<String>,
    pub warranty_days: Option<i32>,
    pub warranty_kilometers: Option<i32>,
    pub is_highlighted: Option<bool>,
    pub has_emergency_service: Option<bool>,
    pub emergency_service_fee: Option<f64>,
}

/// Create an offering for a service center.
///
/// When the caller does not provide a base price, the service type's
/// components are fetched from the catalog and their costs summed.
pub async fn create_center_offering(
    db: &DatabaseConnection,
    catalog: &ComponentCatalog,
    service_center_id: Uuid,
    input: OfferingInput,
    auth: Option<&str>,
) -> Result<offering::Model, ServiceError> {
    info!(%service_center_id, service_type_id = %input.service_type_id,
        "starting service center offering creation");

    let base_price = match input.base_price {
        Some(price) => price,
        None => {
            let components = catalog.fetch_components(input.service_type_id, auth).await?;
            let calculated = pricing::total_cost(&components);
            info!(service_type_id = %input.service_type_id,
                component_count = components.len(), calculated_base_price = calculated,
                "calculated base price from components");
            calculated
        }
    };

    let am = offering::ActiveModel {
        service_center_id: Set(service_center_id),
        service_type_id: Set(input.service_type_id),
        status: Set(input.status.unwrap_or_else(|| "ACTIVE".to_string())),
        base_price: Set(base_price),
        discount_percentage: Set(input.discount_percentage),
        discount_valid_until: Set(input.discount_valid_until),
        time_to_complete: Set(input.time_to_complete),
        available_priorities: Set(input.available_priorities.unwrap_or_else(|| json!(["NORMAL"]))),
        priority_prices: Set(input.priority_prices.unwrap_or_else(|| json!({}))),
        minimum_advance_booking: Set(input.minimum_advance_booking),
        terms_and_conditions: Set(input.terms_and_conditions),
        payment_policy: Set(input
            .payment_policy
            .unwrap_or_else(|| "PAYMENT_AFTER_SERVICE".to_string())),
        warranty_days: Set(input.warranty_days),
        warranty_kilometers: Set(input.warranty_kilometers),
        is_highlighted: Set(input.is_highlighted),
        has_emergency_service: Set(input.has_emergency_service),
        emergency_service_fee: Set(input.emergency_service_fee),
        ..Default::default()
    };

    let created = am.insert(db).await.map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::Conflict(
            "a service center offering for this service type already exists".to_string(),
        ),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ServiceError::NotFound("service center or service type not found".to_string())
        }
        _ => ServiceError::from(err),
    })?;

    info!(offering_id = %created.id, %service_center_id, base_price = created.base_price,
        "service center offering created");
    Ok(created)
}

/// Update an offering after verifying it belongs to the given center.
pub async fn update_center_offering(
    db: &DatabaseConnection,
    service_center_id: Uuid,
    offering_id: Uuid,
    patch: OfferingPatch,
) -> Result<offering::Model, ServiceError> {
    let existing = offering::Entity::find()
        .filter(offering::Column::Id.eq(offering_id))
        .filter(offering::Column::ServiceCenterId.eq(service_center_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "service center offering not found with id: {offering_id}"
            ))
        })?;

    let mut am: offering::ActiveModel = existing.into();
    if let Some(service_type_id) = patch.service_type_id {
        am.service_type_id = Set(service_type_id);
    }
    if let Some(status) = patch.status {
        am.status = Set(status);
    }
    if let Some(base_price) = patch.base_price {
        am.base_price = Set(base_price);
    }
    if let Some(discount_percentage) = patch.discount_percentage {
        am.discount_percentage = Set(Some(discount_percentage));
    }
    if let Some(discount_valid_until) = patch.discount_valid_until {
        am.discount_valid_until = Set(Some(discount_valid_until));
    }
    if let Some(time_to_complete) = patch.time_to_complete {
        am.time_to_complete = Set(Some(time_to_complete));
    }
    if let Some(available_priorities) = patch.available_priorities {
        am.available_priorities = Set(available_priorities);
    }
    if let Some(priority_prices) = patch.priority_prices {
        am.priority_prices = Set(priority_prices);
    }
    if let Some(minimum_advance_booking) = patch.minimum_advance_booking {
        am.minimum_advance_booking = Set(Some(minimum_advance_booking));
    }
    if let Some(terms_and_conditions) = patch.terms_and_conditions {
        am.terms_and_conditions = Set(Some(terms_and_conditions));
    }
    if let Some(payment_policy) = patch.payment_policy {
        am.payment_policy = Set(payment_policy);
    }
    if let Some(warranty_days) = patch.warranty_days {
        am.warranty_days = Set(Some(warranty_days));
    }
    if let Some(warranty_kilometers) = patch.warranty_kilometers {
        am.warranty_kilometers = Set(Some(warranty_kilometers));
    }
    if let Some(is_highlighted) = patch.is_highlighted {
        am.is_highlighted = Set(is_highlighted);
    }
    if let Some(has_emergency_service) = patch.has_emergency_service {
        am.has_emergency_service = Set(has_emergency_service);
    }
    if let Some(emergency_service_fee) = patch.emergency_service_fee {
        am.emergency_service_fee = Set(Some(emergency_service_fee));
    }
    am.updated_at = Set(Utc::now().into());

    let updated = am.update(db).await.map_err(|err| match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ServiceError::NotFound("service type not found".to_string())
        }
        _ => ServiceError::from(err),
    })?;

    info!(offering_id = %updated.id, %service_center_id, "service center offering updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category_service::{create_category, CategoryInput};
    use crate::test_support::get_db;
    use crate::type_service::{create_type, ServiceTypeInput};
    use migration::MigratorTrait;

    #[tokio::test]
    async fn offering_with_explicit_price_skips_catalog_and_detects_duplicates(
    ) -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        migration::Migrator::up(&db, None).await?;

        let category = create_category(
            &db,
            CategoryInput {
                name: format!("offer_cat_{}", Uuid::new_v4()),
                description: None,
                vehicle_type: None,
                icon: None,
                display_order: None,
                is_popular: false,
            },
        )
        .await?;
        let service_type = create_type(
            &db,
            ServiceTypeInput {
                category_id: category.id,
                name: format!("offer_type_{}", Uuid::new_v4()),
                description: None,
                long_description: None,
                estimated_duration: None,
                display_image: None,
                recommended_frequency: None,
                warning_threshold: None,
                display_order: None,
                is_popular: false,
            },
        )
        .await?;
        let center = create_center(
            &db,
            CenterInput {
                name: format!("offer_center_{}", Uuid::new_v4()),
                status: None,
                phone: None,
                email: None,
                description: None,
            },
        )
        .await?;

        // catalog points nowhere; an explicit base price must not touch it
        let catalog = ComponentCatalog::new("http://127.0.0.1:1");
        let input = OfferingInput {
            service_type_id: service_type.id,
            status: None,
            base_price: Some(99.0),
            discount_percentage: None,
            discount_valid_until: None,
            time_to_complete: Some(60),
            available_priorities: None,
            priority_prices: None,
            minimum_advance_booking: None,
            terms_and_conditions: None,
            payment_policy: None,
            warranty_days: None,
            warranty_kilometers: None,
            is_highlighted: false,
            has_emergency_service: false,
            emergency_service_fee: None,
        };
        let created =
            create_center_offering(&db, &catalog, center.id, input.clone(), None).await?;
        assert_eq!(created.base_price, 99.0);
        assert_eq!(created.status, "ACTIVE");
        assert_eq!(created.payment_policy, "PAYMENT_AFTER_SERVICE");

        // second offering for the same (center, type) pair conflicts
        let dup = create_center_offering(&db, &catalog, center.id, input, None).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let patched = update_center_offering(
            &db,
            center.id,
            created.id,
            OfferingPatch { base_price: Some(120.0), ..Default::default() },
        )
        .await?;
        assert_eq!(patched.base_price, 120.0);

        // missing base price with an unreachable catalog is a dependency error
        let no_price = OfferingInput {
            service_type_id: service_type.id,
            base_price: None,
            status: None,
            discount_percentage: None,
            discount_valid_until: None,
            time_to_complete: None,
            available_priorities: None,
            priority_prices: None,
            minimum_advance_booking: None,
            terms_and_conditions: None,
            payment_policy: None,
            warranty_days: None,
            warranty_kilometers: None,
            is_highlighted: false,
            has_emergency_service: false,
            emergency_service_fee: None,
        };
        let err = create_center_offering(&db, &catalog, center.id, no_price, None).await;
        assert!(matches!(err, Err(ServiceError::Dependency(_))));

        // cleanup cascades through offerings
        delete_center(&db, center.id).await?;
        crate::type_service::delete_type(&db, service_type.id).await?;
        crate::category_service::delete_category(&db, category.id).await?;
        Ok(())
    }
}
