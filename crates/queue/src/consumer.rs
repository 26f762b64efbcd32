//! Queue consumers: one strictly-serial loop per queue.
//!
//! A handled message is acked. Any failure (malformed payload, unknown
//! collection or action, store error) nacks without requeue, so the message
//! is dropped rather than looping back as a poison message.

use std::future::Future;
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use service::errors::ServiceError;
use service::ops::{self, Action, Collection, OperationRequest};

use crate::broker::{QueueError, BULK_OPERATIONS_QUEUE, WRITE_OPERATIONS_QUEUE};
use crate::message::QueueMessage;
use crate::relay::QueueRelay;

/// Handle a single-write message: dispatch one create/update/delete
/// directly against the store.
pub async fn process_write_operation(
    db: &DatabaseConnection,
    message: &QueueMessage,
) -> Result<Value, ServiceError> {
    let op: OperationRequest = serde_json::from_value(message.data.clone()).map_err(|err| {
        ServiceError::Validation(format!("invalid message format: {err}"))
    })?;
    match Action::parse(&op.action)? {
        Action::Create | Action::Update | Action::Delete => {
            let result = ops::apply_operation(db, &op).await?;
            info!(model = %op.model, action = %op.action, "processed write operation");
            Ok(result)
        }
        Action::CreateMany => Err(ServiceError::UnknownAction(
            "createMany is not a single write operation".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
struct BulkRequest {
    model: String,
    action: String,
    #[serde(default)]
    payload: Option<Value>,
}

/// Handle a bulk message: `createMany` bulk-inserts with duplicate skip,
/// `bulkTransaction` runs the payload as one atomic batch.
pub async fn process_bulk_operation(
    db: &DatabaseConnection,
    message: &QueueMessage,
) -> Result<Value, ServiceError> {
    let request: BulkRequest = serde_json::from_value(message.data.clone()).map_err(|err| {
        ServiceError::Validation(format!("invalid message format: {err}"))
    })?;
    let collection = Collection::parse(&request.model)?;
    let items = match request.payload {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => {
            return Err(ServiceError::Validation(
                "invalid message format: payload must be a non-empty array".to_string(),
            ))
        }
    };

    let result = match request.action.as_str() {
        "createMany" => {
            let count = collection.insert_many(db, items).await?;
            json!({ "count": count })
        }
        "bulkTransaction" => {
            let operations: Vec<OperationRequest> = items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<_, _>>()
                .map_err(|err| {
                    ServiceError::Validation(format!("invalid message format: {err}"))
                })?;
            Value::Array(ops::execute_operations(db, &operations).await?)
        }
        other => return Err(ServiceError::UnknownAction(other.to_string())),
    };

    info!(model = %request.model, action = %request.action, "processed bulk operation");
    Ok(result)
}

/// Consume one queue until the relay shuts down. The channel is re-acquired
/// after a broker loss; the relay's reconnect loop paces the retries.
pub async fn consume_loop<F, Fut>(relay: Arc<QueueRelay>, queue: &'static str, handler: F)
where
    F: Fn(QueueMessage) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ServiceError>> + Send,
{
    loop {
        let channel = match relay.channel().await {
            Ok(channel) => channel,
            Err(QueueError::Shutdown) => return,
            Err(err) => {
                error!(queue, error = %err, "error starting consumer, will retry");
                tokio::time::sleep(relay.retry_delay()).await;
                continue;
            }
        };
        info!(queue, "started consuming messages");

        loop {
            match channel.recv(queue).await {
                Ok(Some(delivery)) => {
                    let outcome = match serde_json::from_slice::<QueueMessage>(&delivery.payload)
                    {
                        Ok(message) => handler(message).await,
                        Err(err) => Err(ServiceError::Validation(format!(
                            "invalid message payload: {err}"
                        ))),
                    };
                    match outcome {
                        Ok(_) => {
                            if let Err(err) = channel.ack(&delivery).await {
                                error!(queue, error = %err, "failed to ack message");
                                break;
                            }
                        }
                        Err(err) => {
                            error!(queue, error = %err, "error processing message");
                            // drop the message: requeueing a poison message
                            // would loop forever
                            if let Err(nack_err) = channel.nack(&delivery, false).await {
                                error!(queue, error = %nack_err, "failed to nack message");
                                break;
                            }
                        }
                    }
                }
                Ok(None) => {
                    warn!(queue, "channel closed, waiting for reconnection");
                    break;
                }
                Err(err) => {
                    error!(queue, error = %err, "error consuming from queue");
                    break;
                }
            }
        }
    }
}

/// Start the write and bulk consumers as independent loops.
pub fn start_consumers(relay: Arc<QueueRelay>, db: DatabaseConnection) -> Vec<JoinHandle<()>> {
    let write_handle = {
        let relay = Arc::clone(&relay);
        let db = db.clone();
        tokio::spawn(consume_loop(relay, WRITE_OPERATIONS_QUEUE, move |message| {
            let db = db.clone();
            async move { process_write_operation(&db, &message).await }
        }))
    };
    let bulk_handle = {
        let relay = Arc::clone(&relay);
        tokio::spawn(consume_loop(relay, BULK_OPERATIONS_QUEUE, move |message| {
            let db = db.clone();
            async move { process_bulk_operation(&db, &message).await }
        }))
    };
    info!("queue consumers started");
    vec![write_handle, bulk_handle]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBroker;
    use crate::producer::publish_write_operation;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::timeout;

    async fn wait_until_empty(broker: &InMemoryBroker, queue: &str) {
        timeout(Duration::from_secs(1), async {
            while broker.message_count(queue) > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("queue should drain");
    }

    #[tokio::test]
    async fn successful_handler_acks_exactly_once() {
        let broker = InMemoryBroker::new();
        let relay = QueueRelay::with_retry_delay(
            Arc::new(broker.clone()),
            Duration::from_millis(20),
        );
        let handled = Arc::new(AtomicUsize::new(0));

        let loop_handle = {
            let relay = Arc::clone(&relay);
            let handled = Arc::clone(&handled);
            tokio::spawn(consume_loop(relay, WRITE_OPERATIONS_QUEUE, move |_message| {
                let handled = Arc::clone(&handled);
                async move {
                    handled.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::Null)
                }
            }))
        };

        publish_write_operation(&relay, serde_json::json!({"model": "brand"})).await.unwrap();
        wait_until_empty(&broker, WRITE_OPERATIONS_QUEUE).await;
        assert_eq!(handled.load(Ordering::SeqCst), 1);

        relay.close().await;
        timeout(Duration::from_secs(1), loop_handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn failed_handler_drops_the_message_without_redelivery() {
        let broker = InMemoryBroker::new();
        let relay = QueueRelay::with_retry_delay(
            Arc::new(broker.clone()),
            Duration::from_millis(20),
        );
        let attempts = Arc::new(AtomicUsize::new(0));

        let loop_handle = {
            let relay = Arc::clone(&relay);
            let attempts = Arc::clone(&attempts);
            tokio::spawn(consume_loop(relay, WRITE_OPERATIONS_QUEUE, move |_message| {
                let attempts = Arc::clone(&attempts);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(ServiceError::Validation("boom".to_string()))
                }
            }))
        };

        publish_write_operation(&relay, serde_json::json!({"model": "brand"})).await.unwrap();
        wait_until_empty(&broker, WRITE_OPERATIONS_QUEUE).await;

        // give a would-be redelivery time to happen
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(broker.message_count(WRITE_OPERATIONS_QUEUE), 0);

        relay.close().await;
        timeout(Duration::from_secs(1), loop_handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn malformed_payload_is_dropped() {
        let broker = InMemoryBroker::new();
        let relay = QueueRelay::with_retry_delay(
            Arc::new(broker.clone()),
            Duration::from_millis(20),
        );
        let handled = Arc::new(AtomicUsize::new(0));

        let loop_handle = {
            let relay = Arc::clone(&relay);
            let handled = Arc::clone(&handled);
            tokio::spawn(consume_loop(relay, WRITE_OPERATIONS_QUEUE, move |_message| {
                let handled = Arc::clone(&handled);
                async move {
                    handled.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::Null)
                }
            }))
        };

        let channel = relay.channel().await.unwrap();
        channel
            .send_to_queue(
                WRITE_OPERATIONS_QUEUE,
                b"not json".to_vec(),
                crate::broker::PublishOptions::default(),
            )
            .await
            .unwrap();
        wait_until_empty(&broker, WRITE_OPERATIONS_QUEUE).await;
        assert_eq!(handled.load(Ordering::SeqCst), 0);

        relay.close().await;
        timeout(Duration::from_secs(1), loop_handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn consumer_survives_broker_loss() {
        let broker = InMemoryBroker::new();
        let relay = QueueRelay::with_retry_delay(
            Arc::new(broker.clone()),
            Duration::from_millis(20),
        );
        let handled = Arc::new(AtomicUsize::new(0));

        let loop_handle = {
            let relay = Arc::clone(&relay);
            let handled = Arc::clone(&handled);
            tokio::spawn(consume_loop(relay, WRITE_OPERATIONS_QUEUE, move |_message| {
                let handled = Arc::clone(&handled);
                async move {
                    handled.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::Null)
                }
            }))
        };

        publish_write_operation(&relay, serde_json::json!({"n": 1})).await.unwrap();
        wait_until_empty(&broker, WRITE_OPERATIONS_QUEUE).await;

        broker.kill_connections();
        // wait out the reconnect delay, then publish again
        timeout(Duration::from_secs(1), async {
            loop {
                if publish_write_operation(&relay, serde_json::json!({"n": 2})).await.is_ok() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("publishing should resume after reconnect");
        wait_until_empty(&broker, WRITE_OPERATIONS_QUEUE).await;
        assert_eq!(handled.load(Ordering::SeqCst), 2);

        relay.close().await;
        timeout(Duration::from_secs(1), loop_handle).await.unwrap().unwrap();
    }
}
