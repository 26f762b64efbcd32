use chrono::{NaiveTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::operating_hour;

use crate::errors::ServiceError;
use crate::validate::ensure_day_of_week;

#[derive(Debug, Clone, Deserialize)]
pub struct OperatingHourInput {
    pub service_center_id: Uuid,
    pub day_of_week: i32,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    #[serde(default)]
    pub is_closed: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct OperatingHourPatch {
    pub day_of_week: Option<i32>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub is_closed: Option<bool>,
}

/// Create an operating-hour row for a service center.
pub async fn create_operating_hour(
    db: &DatabaseConnection,
    input: OperatingHourInput,
) -> Result<operating_hour::Model, ServiceError> {
    ensure_day_of_week(input.day_of_week)?;
    if !input.is_closed && (input.open_time.is_none() || input.close_time.is_none()) {
        return Err(ServiceError::Validation(
            "open_time and close_time are required unless the day is closed".to_string(),
        ));
    }
    let am = operating_hour::ActiveModel {
        service_center_id: Set(input.service_center_id),
        day_of_week: Set(input.day_of_week),
        open_time: Set(input.open_time),
        close_time: Set(input.close_time),
        is_closed: Set(input.is_closed),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

/// Update an operating-hour row by id.
pub async fn update_operating_hour(
    db: &DatabaseConnection,
    id: Uuid,
    patch: OperatingHourPatch,
) -> Result<operating_hour::Model, ServiceError> {
    if let Some(day_of_week) = patch.day_of_week {
        ensure_day_of_week(day_of_week)?;
    }
    let mut am: operating_hour::ActiveModel = operating_hour::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no operating hours found with id: {id}")))?
        .into();
    if let Some(day_of_week) = patch.day_of_week {
        am.day_of_week = Set(day_of_week);
    }
    if let Some(open_time) = patch.open_time {
        am.open_time = Set(Some(open_time));
    }
    if let Some(close_time) = patch.close_time {
        am.close_time = Set(Some(close_time));
    }
    if let Some(is_closed) = patch.is_closed {
        am.is_closed = Set(is_closed);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

/// Delete an operating-hour row by id; returns the deleted record.
pub async fn delete_operating_hour(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<operating_hour::Model, ServiceError> {
    let found = operating_hour::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no operating hours found with id: {id}")))?;
    operating_hour::Entity::delete_by_id(id).exec(db).await?;
    Ok(found)
}
