use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which handler a message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Write,
    Bulk,
}

/// Envelope stored on the broker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueMessage {
    /// Publish time, unix milliseconds.
    pub timestamp: i64,
    pub operation: OperationKind,
    pub data: Value,
}

impl QueueMessage {
    pub fn write(data: Value) -> Self {
        Self { timestamp: Utc::now().timestamp_millis(), operation: OperationKind::Write, data }
    }

    pub fn bulk(data: Value) -> Self {
        Self { timestamp: Utc::now().timestamp_millis(), operation: OperationKind::Bulk, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_round_trips() {
        let message = QueueMessage::write(json!({"model": "brand", "action": "create"}));
        let bytes = serde_json::to_vec(&message).unwrap();
        let parsed: QueueMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.operation, OperationKind::Write);
        assert_eq!(parsed.data["model"], json!("brand"));
        assert!(parsed.timestamp > 0);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let message = QueueMessage::bulk(json!([]));
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["operation"], json!("bulk"));
    }
}
