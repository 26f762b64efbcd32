use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Queue for single create/update/delete operations.
pub const WRITE_OPERATIONS_QUEUE: &str = "write_operations";
/// Queue for bulk operations (createMany / bulkTransaction).
pub const BULK_OPERATIONS_QUEUE: &str = "bulk_operations";

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("broker connection failed: {0}")]
    Connect(String),
    #[error("channel is closed")]
    ChannelClosed,
    #[error("unknown queue: {0}")]
    UnknownQueue(String),
    #[error("queue relay is shut down")]
    Shutdown,
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Options applied to a single publish.
#[derive(Debug, Clone, Copy)]
pub struct PublishOptions {
    /// Ask the broker to persist the message so it survives a restart.
    pub persistent: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self { persistent: true }
    }
}

/// One message handed to a consumer; must be acked or nacked exactly once.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub queue: String,
    pub tag: u64,
    pub payload: Vec<u8>,
    pub redelivered: bool,
}

#[async_trait]
pub trait Broker: Send + Sync {
    /// Open a fresh channel to the broker.
    async fn connect(&self) -> Result<Arc<dyn Channel>, QueueError>;
}

/// A live channel to the broker. Pull-based: `recv` blocks until a message
/// is deliverable under the prefetch limit, and returns `None` once the
/// channel dies.
#[async_trait]
pub trait Channel: Send + Sync {
    async fn assert_queue(&self, queue: &str, durable: bool) -> Result<(), QueueError>;
    async fn prefetch(&self, count: u16) -> Result<(), QueueError>;
    async fn send_to_queue(
        &self,
        queue: &str,
        payload: Vec<u8>,
        options: PublishOptions,
    ) -> Result<bool, QueueError>;
    async fn recv(&self, queue: &str) -> Result<Option<Delivery>, QueueError>;
    async fn ack(&self, delivery: &Delivery) -> Result<(), QueueError>;
    async fn nack(&self, delivery: &Delivery, requeue: bool) -> Result<(), QueueError>;
    fn is_open(&self) -> bool;
    /// Resolves once the channel is no longer usable.
    async fn closed(&self);
    async fn close(&self) -> Result<(), QueueError>;
}
