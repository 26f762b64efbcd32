//! In-memory broker for single-process deployments and tests.
//!
//! Implements the durable-queue contract: messages survive channel loss,
//! unacknowledged deliveries are requeued when a connection dies, and
//! nack without requeue drops the message permanently. Connection failures
//! and broker loss can be injected for reconnect tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::broker::{Broker, Channel, Delivery, PublishOptions, QueueError};

#[derive(Debug, Clone)]
struct StoredMessage {
    payload: Vec<u8>,
    #[allow(dead_code)]
    persistent: bool,
    redelivered: bool,
}

#[derive(Debug, Default)]
struct QueueState {
    #[allow(dead_code)]
    durable: bool,
    ready: VecDeque<StoredMessage>,
    unacked: HashMap<u64, StoredMessage>,
    next_tag: u64,
}

#[derive(Default)]
struct BrokerInner {
    queues: Mutex<HashMap<String, QueueState>>,
    notify: Notify,
    epoch: AtomicU64,
    connect_failures: AtomicU32,
    connect_count: AtomicU32,
}

#[derive(Clone, Default)]
pub struct InMemoryBroker {
    inner: Arc<BrokerInner>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total messages held for a queue (ready + unacknowledged).
    pub fn message_count(&self, queue: &str) -> usize {
        let queues = self.inner.queues.lock().unwrap();
        queues.get(queue).map_or(0, |q| q.ready.len() + q.unacked.len())
    }

    /// Messages waiting for delivery on a queue.
    pub fn ready_count(&self, queue: &str) -> usize {
        let queues = self.inner.queues.lock().unwrap();
        queues.get(queue).map_or(0, |q| q.ready.len())
    }

    /// How many times `connect` has been called.
    pub fn connect_count(&self) -> u32 {
        self.inner.connect_count.load(Ordering::SeqCst)
    }

    /// Make the next `n` connection attempts fail.
    pub fn fail_next_connects(&self, n: u32) {
        self.inner.connect_failures.store(n, Ordering::SeqCst);
    }

    /// Drop every open channel, requeueing unacknowledged deliveries.
    pub fn kill_connections(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        let mut queues = self.inner.queues.lock().unwrap();
        for state in queues.values_mut() {
            let tags: Vec<u64> = state.unacked.keys().copied().collect();
            for tag in tags {
                if let Some(mut message) = state.unacked.remove(&tag) {
                    message.redelivered = true;
                    state.ready.push_front(message);
                }
            }
        }
        drop(queues);
        self.inner.notify.notify_waiters();
    }
}

#[async_trait]
impl Broker for InMemoryBroker {
    async fn connect(&self) -> Result<Arc<dyn Channel>, QueueError> {
        self.inner.connect_count.fetch_add(1, Ordering::SeqCst);
        let failures = self.inner.connect_failures.load(Ordering::SeqCst);
        if failures > 0 {
            self.inner.connect_failures.store(failures - 1, Ordering::SeqCst);
            return Err(QueueError::Connect("simulated connection failure".to_string()));
        }
        Ok(Arc::new(InMemoryChannel {
            inner: Arc::clone(&self.inner),
            epoch: self.inner.epoch.load(Ordering::SeqCst),
            prefetch: AtomicU16::new(0),
            open: AtomicBool::new(true),
        }))
    }
}

struct InMemoryChannel {
    inner: Arc<BrokerInner>,
    epoch: u64,
    prefetch: AtomicU16,
    open: AtomicBool,
}

impl InMemoryChannel {
    fn ensure_open(&self) -> Result<(), QueueError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(QueueError::ChannelClosed)
        }
    }

    fn try_pop(&self, queue: &str) -> Result<Option<Delivery>, QueueError> {
        let mut queues = self.inner.queues.lock().unwrap();
        let state = queues
            .get_mut(queue)
            .ok_or_else(|| QueueError::UnknownQueue(queue.to_string()))?;
        let prefetch = self.prefetch.load(Ordering::SeqCst) as usize;
        if prefetch != 0 && state.unacked.len() >= prefetch {
            return Ok(None);
        }
        let Some(message) = state.ready.pop_front() else {
            return Ok(None);
        };
        let tag = state.next_tag;
        state.next_tag += 1;
        let delivery = Delivery {
            queue: queue.to_string(),
            tag,
            payload: message.payload.clone(),
            redelivered: message.redelivered,
        };
        state.unacked.insert(tag, message);
        Ok(Some(delivery))
    }
}

#[async_trait]
impl Channel for InMemoryChannel {
    async fn assert_queue(&self, queue: &str, durable: bool) -> Result<(), QueueError> {
        self.ensure_open()?;
        let mut queues = self.inner.queues.lock().unwrap();
        queues
            .entry(queue.to_string())
            .or_insert_with(|| QueueState { durable, ..Default::default() });
        Ok(())
    }

    async fn prefetch(&self, count: u16) -> Result<(), QueueError> {
        self.ensure_open()?;
        self.prefetch.store(count, Ordering::SeqCst);
        Ok(())
    }

    async fn send_to_queue(
        &self,
        queue: &str,
        payload: Vec<u8>,
        options: PublishOptions,
    ) -> Result<bool, QueueError> {
        self.ensure_open()?;
        let mut queues = self.inner.queues.lock().unwrap();
        let state = queues
            .get_mut(queue)
            .ok_or_else(|| QueueError::UnknownQueue(queue.to_string()))?;
        state.ready.push_back(StoredMessage {
            payload,
            persistent: options.persistent,
            redelivered: false,
        });
        drop(queues);
        self.inner.notify.notify_waiters();
        Ok(true)
    }

    async fn recv(&self, queue: &str) -> Result<Option<Delivery>, QueueError> {
        loop {
            // register for wakeups before checking state, or a publish
            // landing in between would be missed
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if !self.is_open() {
                return Ok(None);
            }
            if let Some(delivery) = self.try_pop(queue)? {
                return Ok(Some(delivery));
            }
            notified.await;
        }
    }

    async fn ack(&self, delivery: &Delivery) -> Result<(), QueueError> {
        self.ensure_open()?;
        let mut queues = self.inner.queues.lock().unwrap();
        if let Some(state) = queues.get_mut(&delivery.queue) {
            state.unacked.remove(&delivery.tag);
        }
        drop(queues);
        self.inner.notify.notify_waiters();
        Ok(())
    }

    async fn nack(&self, delivery: &Delivery, requeue: bool) -> Result<(), QueueError> {
        self.ensure_open()?;
        let mut queues = self.inner.queues.lock().unwrap();
        if let Some(state) = queues.get_mut(&delivery.queue) {
            if let Some(mut message) = state.unacked.remove(&delivery.tag) {
                if requeue {
                    message.redelivered = true;
                    state.ready.push_front(message);
                }
            }
        }
        drop(queues);
        self.inner.notify.notify_waiters();
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst) && self.epoch == self.inner.epoch.load(Ordering::SeqCst)
    }

    async fn closed(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if !self.is_open() {
                return;
            }
            notified.await;
        }
    }

    async fn close(&self) -> Result<(), QueueError> {
        self.open.store(false, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn channel_with_queue(broker: &InMemoryBroker, queue: &str) -> Arc<dyn Channel> {
        let channel = broker.connect().await.unwrap();
        channel.assert_queue(queue, true).await.unwrap();
        channel
    }

    #[tokio::test]
    async fn acked_message_is_removed() {
        let broker = InMemoryBroker::new();
        let channel = channel_with_queue(&broker, "q").await;

        channel.send_to_queue("q", b"one".to_vec(), PublishOptions::default()).await.unwrap();
        let delivery = channel.recv("q").await.unwrap().unwrap();
        assert_eq!(delivery.payload, b"one");
        assert!(!delivery.redelivered);

        channel.ack(&delivery).await.unwrap();
        assert_eq!(broker.message_count("q"), 0);
    }

    #[tokio::test]
    async fn nack_without_requeue_drops_the_message() {
        let broker = InMemoryBroker::new();
        let channel = channel_with_queue(&broker, "q").await;

        channel.send_to_queue("q", b"bad".to_vec(), PublishOptions::default()).await.unwrap();
        let delivery = channel.recv("q").await.unwrap().unwrap();
        channel.nack(&delivery, false).await.unwrap();

        assert_eq!(broker.message_count("q"), 0);
        let next = timeout(Duration::from_millis(50), channel.recv("q")).await;
        assert!(next.is_err(), "dropped message must not be redelivered");
    }

    #[tokio::test]
    async fn nack_with_requeue_redelivers_at_the_front() {
        let broker = InMemoryBroker::new();
        let channel = channel_with_queue(&broker, "q").await;

        channel.send_to_queue("q", b"first".to_vec(), PublishOptions::default()).await.unwrap();
        channel.send_to_queue("q", b"second".to_vec(), PublishOptions::default()).await.unwrap();

        let delivery = channel.recv("q").await.unwrap().unwrap();
        channel.nack(&delivery, true).await.unwrap();

        let redelivered = channel.recv("q").await.unwrap().unwrap();
        assert_eq!(redelivered.payload, b"first");
        assert!(redelivered.redelivered);
    }

    #[tokio::test]
    async fn prefetch_one_blocks_until_ack() {
        let broker = InMemoryBroker::new();
        let channel = channel_with_queue(&broker, "q").await;
        channel.prefetch(1).await.unwrap();

        channel.send_to_queue("q", b"a".to_vec(), PublishOptions::default()).await.unwrap();
        channel.send_to_queue("q", b"b".to_vec(), PublishOptions::default()).await.unwrap();

        let first = channel.recv("q").await.unwrap().unwrap();
        let blocked = timeout(Duration::from_millis(50), channel.recv("q")).await;
        assert!(blocked.is_err(), "second delivery must wait for the first ack");

        channel.ack(&first).await.unwrap();
        let second = channel.recv("q").await.unwrap().unwrap();
        assert_eq!(second.payload, b"b");
    }

    #[tokio::test]
    async fn killed_connection_requeues_unacked_deliveries() {
        let broker = InMemoryBroker::new();
        let channel = channel_with_queue(&broker, "q").await;

        channel.send_to_queue("q", b"inflight".to_vec(), PublishOptions::default()).await.unwrap();
        let delivery = channel.recv("q").await.unwrap().unwrap();

        broker.kill_connections();
        assert!(!channel.is_open());
        assert!(matches!(channel.ack(&delivery).await, Err(QueueError::ChannelClosed)));
        assert_eq!(broker.ready_count("q"), 1);

        // a fresh channel sees the message again, marked redelivered
        let channel = channel_with_queue(&broker, "q").await;
        let redelivered = channel.recv("q").await.unwrap().unwrap();
        assert!(redelivered.redelivered);
    }

    #[tokio::test]
    async fn unknown_queue_is_an_error() {
        let broker = InMemoryBroker::new();
        let channel = broker.connect().await.unwrap();
        let res = channel.send_to_queue("missing", vec![], PublishOptions::default()).await;
        assert!(matches!(res, Err(QueueError::UnknownQueue(_))));
    }
}
