//! Durable queue relay between the HTTP producers and the write consumers.
//!
//! The broker itself is behind the `Broker`/`Channel` traits; the in-memory
//! implementation ships with the crate and an external AMQP broker can be
//! slotted in without touching the relay, producer, or consumer code.

pub mod broker;
pub mod consumer;
pub mod memory;
pub mod message;
pub mod producer;
pub mod relay;

pub use broker::{
    Broker, Channel, Delivery, PublishOptions, QueueError, BULK_OPERATIONS_QUEUE,
    WRITE_OPERATIONS_QUEUE,
};
pub use memory::InMemoryBroker;
pub use message::{OperationKind, QueueMessage};
pub use relay::{ConnectionState, QueueRelay};
