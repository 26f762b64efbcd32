use crate::errors::ServiceError;

pub(crate) const VEHICLE_TYPES: [&str; 2] = ["CAR", "BIKE"];

pub(crate) fn ensure_vehicle_type(value: &str) -> Result<(), ServiceError> {
    if VEHICLE_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(ServiceError::Validation("vehicle type must be one of: CAR, BIKE".to_string()))
    }
}

pub(crate) fn ensure_positive_duration(value: i32) -> Result<(), ServiceError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ServiceError::Validation(
            "estimated duration must be a positive integer".to_string(),
        ))
    }
}

pub(crate) fn ensure_day_of_week(value: i32) -> Result<(), ServiceError> {
    if (0..=6).contains(&value) {
        Ok(())
    } else {
        Err(ServiceError::Validation("day of week must be between 0 and 6".to_string()))
    }
}
