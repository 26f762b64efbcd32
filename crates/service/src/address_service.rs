use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::{address, service_center};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct AddressInput {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddressPatch {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

async fn find_by_center(
    db: &DatabaseConnection,
    service_center_id: Uuid,
) -> Result<address::Model, ServiceError> {
    address::Entity::find()
        .filter(address::Column::ServiceCenterId.eq(service_center_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "no address found for service center: {service_center_id}"
            ))
        })
}

/// Create the address for a service center; the center must exist.
pub async fn create_address(
    db: &DatabaseConnection,
    service_center_id: Uuid,
    input: AddressInput,
) -> Result<address::Model, ServiceError> {
    let center = service_center::Entity::find_by_id(service_center_id).one(db).await?;
    if center.is_none() {
        return Err(ServiceError::NotFound(format!(
            "no service center found with id: {service_center_id}"
        )));
    }
    let am = address::ActiveModel {
        service_center_id: Set(service_center_id),
        line1: Set(input.line1),
        line2: Set(input.line2),
        city: Set(input.city),
        state: Set(input.state),
        postal_code: Set(input.postal_code),
        country: Set(input.country),
        latitude: Set(input.latitude),
        longitude: Set(input.longitude),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

/// Update a service center's address.
pub async fn update_address(
    db: &DatabaseConnection,
    service_center_id: Uuid,
    patch: AddressPatch,
) -> Result<address::Model, ServiceError> {
    let mut am: address::ActiveModel = find_by_center(db, service_center_id).await?.into();
    if let Some(line1) = patch.line1 {
        am.line1 = Set(line1);
    }
    if let Some(line2) = patch.line2 {
        am.line2 = Set(Some(line2));
    }
    if let Some(city) = patch.city {
        am.city = Set(city);
    }
    if let Some(state) = patch.state {
        am.state = Set(Some(state));
    }
    if let Some(postal_code) = patch.postal_code {
        am.postal_code = Set(Some(postal_code));
    }
    if let Some(country) = patch.country {
        am.country = Set(Some(country));
    }
    if let Some(latitude) = patch.latitude {
        am.latitude = Set(Some(latitude));
    }
    if let Some(longitude) = patch.longitude {
        am.longitude = Set(Some(longitude));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

/// Delete a service center's address; returns the deleted record.
pub async fn delete_address(
    db: &DatabaseConnection,
    service_center_id: Uuid,
) -> Result<address::Model, ServiceError> {
    let found = find_by_center(db, service_center_id).await?;
    address::Entity::delete_by_id(found.id).exec(db).await?;
    Ok(found)
}
