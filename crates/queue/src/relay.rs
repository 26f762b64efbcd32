//! Process-wide broker connection lifecycle.
//!
//! The channel is created lazily on first use behind a single-flight lock,
//! the durable queues are declared and the prefetch limit applied during
//! initialization, and an unexpected channel loss triggers a fixed-delay
//! reconnect loop until the relay is ready again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tracing::{error, info, warn};

use crate::broker::{
    Broker, Channel, QueueError, BULK_OPERATIONS_QUEUE, WRITE_OPERATIONS_QUEUE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Ready,
}

pub struct QueueRelay {
    broker: Arc<dyn Broker>,
    retry_delay: Duration,
    prefetch: u16,
    channel: Mutex<Option<Arc<dyn Channel>>>,
    state: watch::Sender<ConnectionState>,
    shutdown: AtomicBool,
    reconnect_scheduled: AtomicBool,
    // handle to self for the watchdog/reconnect tasks
    weak: Weak<QueueRelay>,
}

impl QueueRelay {
    pub fn new(broker: Arc<dyn Broker>, cfg: &configs::QueueConfig) -> Arc<Self> {
        Self::build(broker, Duration::from_secs(cfg.retry_delay_secs), cfg.prefetch)
    }

    #[cfg(test)]
    pub(crate) fn with_retry_delay(broker: Arc<dyn Broker>, retry_delay: Duration) -> Arc<Self> {
        Self::build(broker, retry_delay, 1)
    }

    fn build(broker: Arc<dyn Broker>, retry_delay: Duration, prefetch: u16) -> Arc<Self> {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Arc::new_cyclic(|weak| Self {
            broker,
            retry_delay,
            prefetch,
            channel: Mutex::new(None),
            state,
            shutdown: AtomicBool::new(false),
            reconnect_scheduled: AtomicBool::new(false),
            weak: weak.clone(),
        })
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Observe connection state transitions.
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Get the ready channel, initializing it if needed. Concurrent first
    /// callers share a single initialization. On failure the error goes to
    /// the caller and a background retry is scheduled.
    pub async fn channel(&self) -> Result<Arc<dyn Channel>, QueueError> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(QueueError::Shutdown);
        }
        let mut guard = self.channel.lock().await;
        if let Some(channel) = guard.as_ref() {
            if channel.is_open() {
                return Ok(Arc::clone(channel));
            }
        }
        self.state.send_replace(ConnectionState::Connecting);
        match self.initialize().await {
            Ok(channel) => {
                *guard = Some(Arc::clone(&channel));
                self.state.send_replace(ConnectionState::Ready);
                self.spawn_watchdog(Arc::clone(&channel));
                info!("message broker connection established");
                Ok(channel)
            }
            Err(err) => {
                self.state.send_replace(ConnectionState::Disconnected);
                error!(error = %err, "error connecting to message broker");
                self.schedule_reconnect();
                Err(err)
            }
        }
    }

    async fn initialize(&self) -> Result<Arc<dyn Channel>, QueueError> {
        let channel = self.broker.connect().await?;
        channel.assert_queue(WRITE_OPERATIONS_QUEUE, true).await?;
        channel.assert_queue(BULK_OPERATIONS_QUEUE, true).await?;
        channel.prefetch(self.prefetch).await?;
        Ok(channel)
    }

    fn spawn_watchdog(&self, channel: Arc<dyn Channel>) {
        let Some(relay) = self.weak.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            channel.closed().await;
            if relay.shutdown.load(Ordering::SeqCst) {
                return;
            }
            error!("message broker connection closed unexpectedly, attempting to reconnect");
            relay.state.send_replace(ConnectionState::Disconnected);
            relay.schedule_reconnect();
        });
    }

    fn schedule_reconnect(&self) {
        if self.reconnect_scheduled.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(relay) = self.weak.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(relay.retry_delay).await;
                if relay.shutdown.load(Ordering::SeqCst) {
                    break;
                }
                match relay.try_reconnect().await {
                    Ok(()) => break,
                    Err(err) => error!(error = %err, "broker reconnect attempt failed"),
                }
            }
            relay.reconnect_scheduled.store(false, Ordering::SeqCst);
        });
    }

    async fn try_reconnect(&self) -> Result<(), QueueError> {
        let mut guard = self.channel.lock().await;
        if let Some(channel) = guard.as_ref() {
            if channel.is_open() {
                return Ok(());
            }
        }
        self.state.send_replace(ConnectionState::Connecting);
        match self.initialize().await {
            Ok(channel) => {
                *guard = Some(Arc::clone(&channel));
                self.state.send_replace(ConnectionState::Ready);
                self.spawn_watchdog(channel);
                info!("message broker connection re-established");
                Ok(())
            }
            Err(err) => {
                self.state.send_replace(ConnectionState::Disconnected);
                Err(err)
            }
        }
    }

    /// Graceful shutdown: close the channel and stop reconnecting.
    pub async fn close(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let mut guard = self.channel.lock().await;
        if let Some(channel) = guard.take() {
            if let Err(err) = channel.close().await {
                warn!(error = %err, "error closing broker channel");
            }
        }
        self.state.send_replace(ConnectionState::Disconnected);
        info!("message broker connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::PublishOptions;
    use crate::memory::InMemoryBroker;

    #[tokio::test]
    async fn concurrent_first_callers_share_one_connection() {
        let broker = InMemoryBroker::new();
        let relay = QueueRelay::with_retry_delay(
            Arc::new(broker.clone()),
            Duration::from_millis(20),
        );

        let (a, b) = tokio::join!(relay.channel(), relay.channel());
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(broker.connect_count(), 1);
        assert_eq!(*relay.state().borrow(), ConnectionState::Ready);
    }

    #[tokio::test]
    async fn initialization_failure_propagates_and_retries_after_delay() {
        let broker = InMemoryBroker::new();
        broker.fail_next_connects(1);
        let relay = QueueRelay::with_retry_delay(
            Arc::new(broker.clone()),
            Duration::from_millis(20),
        );

        let err = relay.channel().await.err().unwrap();
        assert!(matches!(err, QueueError::Connect(_)));
        assert_eq!(*relay.state().borrow(), ConnectionState::Disconnected);

        // the background loop re-connects after the fixed delay
        let mut state = relay.state();
        tokio::time::timeout(Duration::from_secs(1), async {
            while *state.borrow_and_update() != ConnectionState::Ready {
                state.changed().await.unwrap();
            }
        })
        .await
        .expect("relay should become ready");
        assert_eq!(broker.connect_count(), 2);
    }

    #[tokio::test]
    async fn broker_loss_triggers_reconnect_and_operations_resume() {
        let broker = InMemoryBroker::new();
        let relay = QueueRelay::with_retry_delay(
            Arc::new(broker.clone()),
            Duration::from_millis(20),
        );
        let channel = relay.channel().await.unwrap();
        assert!(channel.is_open());

        broker.kill_connections();

        let mut state = relay.state();
        tokio::time::timeout(Duration::from_secs(1), async {
            while *state.borrow_and_update() != ConnectionState::Ready {
                state.changed().await.unwrap();
            }
        })
        .await
        .expect("relay should reconnect");

        // queue operations work again through the fresh channel
        let channel = relay.channel().await.unwrap();
        channel
            .send_to_queue(WRITE_OPERATIONS_QUEUE, b"after".to_vec(), PublishOptions::default())
            .await
            .unwrap();
        assert_eq!(broker.ready_count(WRITE_OPERATIONS_QUEUE), 1);
    }

    #[tokio::test]
    async fn closed_relay_rejects_callers() {
        let broker = InMemoryBroker::new();
        let relay =
            QueueRelay::with_retry_delay(Arc::new(broker), Duration::from_millis(20));
        relay.channel().await.unwrap();
        relay.close().await;
        assert!(matches!(relay.channel().await, Err(QueueError::Shutdown)));
    }
}
