use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

/// Wire shape of one abstract write operation.
///
/// `model` and `action` stay strings here so that resolution against the
/// closed registries happens per operation, with typed errors; `payload` is
/// accepted as an alias for `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    pub model: String,
    pub action: String,
    #[serde(default, alias = "payload")]
    pub data: Option<Value>,
    #[serde(default, rename = "where")]
    pub filter: Option<Map<String, Value>>,
}

/// Recognized operation kinds. Anything else is rejected before any store
/// access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
    CreateMany,
}

impl Action {
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        match raw {
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "createMany" => Ok(Action::CreateMany),
            other => Err(ServiceError::UnknownAction(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::CreateMany => "createMany",
        }
    }
}

impl OperationRequest {
    /// Payload as a JSON object (create/update).
    pub(crate) fn object_payload(&self) -> Result<Value, ServiceError> {
        match &self.data {
            Some(value @ Value::Object(_)) => Ok(value.clone()),
            Some(_) => Err(ServiceError::Validation(
                "operation payload must be an object".to_string(),
            )),
            None => Err(ServiceError::Validation("operation payload is required".to_string())),
        }
    }

    /// Payload as a non-empty JSON array (createMany).
    pub(crate) fn array_payload(&self) -> Result<Vec<Value>, ServiceError> {
        match &self.data {
            Some(Value::Array(items)) if !items.is_empty() => Ok(items.clone()),
            Some(Value::Array(_)) => Err(ServiceError::Validation(
                "operation payload must be a non-empty array".to_string(),
            )),
            _ => Err(ServiceError::Validation(
                "operation payload must be an array".to_string(),
            )),
        }
    }

    /// Filter map, required non-empty for update/delete.
    pub(crate) fn required_filter(&self) -> Result<&Map<String, Value>, ServiceError> {
        match &self.filter {
            Some(filter) if !filter.is_empty() => Ok(filter),
            _ => Err(ServiceError::Validation(
                "a non-empty `where` filter is required for this action".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_actions() {
        assert_eq!(Action::parse("create").unwrap(), Action::Create);
        assert_eq!(Action::parse("createMany").unwrap(), Action::CreateMany);
        assert!(matches!(Action::parse("upsert"), Err(ServiceError::UnknownAction(_))));
    }

    #[test]
    fn accepts_payload_alias_for_data() {
        let op: OperationRequest = serde_json::from_value(json!({
            "model": "serviceCategory",
            "action": "create",
            "payload": {"name": "Oil Change"}
        }))
        .unwrap();
        assert!(op.object_payload().is_ok());
    }

    #[test]
    fn empty_filter_is_rejected() {
        let op: OperationRequest = serde_json::from_value(json!({
            "model": "serviceCategory",
            "action": "delete",
            "where": {}
        }))
        .unwrap();
        assert!(op.required_filter().is_err());
    }
}
