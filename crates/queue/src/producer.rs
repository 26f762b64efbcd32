use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::broker::{PublishOptions, QueueError, BULK_OPERATIONS_QUEUE, WRITE_OPERATIONS_QUEUE};
use crate::message::QueueMessage;
use crate::relay::QueueRelay;

/// Publish a message to a queue. Messages default to persistent delivery;
/// explicit options may override that. Errors propagate to the caller;
/// retry happens only at the connection-lifecycle level.
pub async fn publish_to_queue(
    relay: &Arc<QueueRelay>,
    queue: &str,
    message: &QueueMessage,
    options: PublishOptions,
) -> Result<bool, QueueError> {
    let channel = relay.channel().await.map_err(|err| {
        error!(queue, error = %err, "error publishing message to queue");
        err
    })?;
    let payload = serde_json::to_vec(message)?;
    let accepted = channel.send_to_queue(queue, payload, options).await.map_err(|err| {
        error!(queue, error = %err, "error publishing message to queue");
        err
    })?;
    debug!(queue, "message published");
    Ok(accepted)
}

/// Publish a single write operation (`create`/`update`/`delete`).
pub async fn publish_write_operation(
    relay: &Arc<QueueRelay>,
    data: Value,
) -> Result<bool, QueueError> {
    publish_to_queue(
        relay,
        WRITE_OPERATIONS_QUEUE,
        &QueueMessage::write(data),
        PublishOptions::default(),
    )
    .await
}

/// Publish a bulk operation (`createMany`/`bulkTransaction`).
pub async fn publish_bulk_operation(
    relay: &Arc<QueueRelay>,
    data: Value,
) -> Result<bool, QueueError> {
    publish_to_queue(
        relay,
        BULK_OPERATIONS_QUEUE,
        &QueueMessage::bulk(data),
        PublishOptions::default(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBroker;
    use crate::message::OperationKind;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn published_messages_land_on_their_queues() {
        let broker = InMemoryBroker::new();
        let relay = QueueRelay::with_retry_delay(
            Arc::new(broker.clone()),
            Duration::from_millis(20),
        );

        let accepted = publish_write_operation(
            &relay,
            json!({"model": "brand", "action": "create", "payload": {"name": "Acme"}}),
        )
        .await
        .unwrap();
        assert!(accepted);
        publish_bulk_operation(&relay, json!({"model": "brand", "action": "createMany"}))
            .await
            .unwrap();

        assert_eq!(broker.ready_count(WRITE_OPERATIONS_QUEUE), 1);
        assert_eq!(broker.ready_count(BULK_OPERATIONS_QUEUE), 1);

        // the stored payload is the serialized envelope
        let channel = relay.channel().await.unwrap();
        let delivery = channel.recv(WRITE_OPERATIONS_QUEUE).await.unwrap().unwrap();
        let message: QueueMessage = serde_json::from_slice(&delivery.payload).unwrap();
        assert_eq!(message.operation, OperationKind::Write);
        assert_eq!(message.data["model"], json!("brand"));
    }

    #[tokio::test]
    async fn publish_failure_propagates() {
        let broker = InMemoryBroker::new();
        broker.fail_next_connects(1);
        let relay =
            QueueRelay::with_retry_delay(Arc::new(broker), Duration::from_millis(200));

        let err = publish_write_operation(&relay, json!({})).await.unwrap_err();
        assert!(matches!(err, QueueError::Connect(_)));
    }
}
