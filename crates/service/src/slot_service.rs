use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::slot;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct SlotInput {
    pub service_center_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SlotPatch {
    pub slot_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub capacity: Option<i32>,
    pub booked_count: Option<i32>,
    pub status: Option<String>,
}

/// Create a bookable slot for a service center.
pub async fn create_slot(
    db: &DatabaseConnection,
    input: SlotInput,
) -> Result<slot::Model, ServiceError> {
    if input.end_time <= input.start_time {
        return Err(ServiceError::Validation("end_time must be after start_time".to_string()));
    }
    let am = slot::ActiveModel {
        service_center_id: Set(input.service_center_id),
        slot_date: Set(input.slot_date),
        start_time: Set(input.start_time),
        end_time: Set(input.end_time),
        capacity: Set(input.capacity.unwrap_or(1)),
        status: Set(input.status.unwrap_or_else(|| "AVAILABLE".to_string())),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

/// Update a slot by id.
pub async fn update_slot(
    db: &DatabaseConnection,
    id: Uuid,
    patch: SlotPatch,
) -> Result<slot::Model, ServiceError> {
    let mut am: slot::ActiveModel = slot::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no slot found with id: {id}")))?
        .into();
    if let Some(slot_date) = patch.slot_date {
        am.slot_date = Set(slot_date);
    }
    if let Some(start_time) = patch.start_time {
        am.start_time = Set(start_time);
    }
    if let Some(end_time) = patch.end_time {
        am.end_time = Set(end_time);
    }
    if let Some(capacity) = patch.capacity {
        am.capacity = Set(capacity);
    }
    if let Some(booked_count) = patch.booked_count {
        am.booked_count = Set(booked_count);
    }
    if let Some(status) = patch.status {
        am.status = Set(status);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

/// Delete a slot by id; returns the deleted record.
pub async fn delete_slot(db: &DatabaseConnection, id: Uuid) -> Result<slot::Model, ServiceError> {
    let found = slot::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no slot found with id: {id}")))?;
    slot::Entity::delete_by_id(id).exec(db).await?;
    Ok(found)
}
