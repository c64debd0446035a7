//! Outbound message delivery: the pusher trait and the bounded
//! per-connection queue behind it.
//!
//! Every live connection owns one [`OutboundQueue`]; the WebSocket writer
//! task drains it. Delivery is best-effort: a full queue evicts its oldest
//! entry instead of blocking the caller, so one stalled peer can never
//! stall relays for the rest of the room. Because registration, peer
//! events, signals and document updates all travel through the same FIFO
//! queue, message order between any two specific connections is preserved.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::value_object::ConnectionId;

pub const DEFAULT_OUTBOUND_CAPACITY: usize = 64;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum MessagePushError {
    #[error("connection {0} is not registered")]
    ConnectionNotFound(String),
}

/// Delivery of already-serialized messages to live connections.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection's outbound queue. A queue already registered
    /// under the same connection is closed and replaced.
    async fn register_connection(&self, connection: ConnectionId, queue: OutboundQueue);

    /// Remove and close a connection's queue. Idempotent.
    async fn unregister_connection(&self, connection: &ConnectionId);

    /// Enqueue a message for one connection.
    async fn push_to(&self, connection: &ConnectionId, content: &str)
        -> Result<(), MessagePushError>;

    /// Enqueue a message for each target. Targets that are no longer
    /// registered are skipped; partial delivery is not an error.
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}

struct QueueInner {
    buf: Mutex<VecDeque<String>>,
    capacity: usize,
    notify: Notify,
    closed: AtomicBool,
}

impl QueueInner {
    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        self.buf.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sender half of a bounded FIFO queue feeding one WebSocket writer.
#[derive(Clone)]
pub struct OutboundQueue {
    inner: Arc<QueueInner>,
}

impl OutboundQueue {
    /// Create a queue with the given capacity (minimum 1) and return the
    /// sender half together with the drain consumed by the writer task.
    pub fn bounded(capacity: usize) -> (Self, OutboundDrain) {
        let inner = Arc::new(QueueInner {
            buf: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
        });
        (
            Self {
                inner: Arc::clone(&inner),
            },
            OutboundDrain { inner },
        )
    }

    /// Enqueue a message without blocking. When the queue is full the
    /// oldest entry is evicted and returned so the caller can log the drop.
    pub fn push(&self, message: String) -> Option<String> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Some(message);
        }
        let evicted = {
            let mut buf = self.inner.lock();
            let evicted = if buf.len() >= self.inner.capacity {
                buf.pop_front()
            } else {
                None
            };
            buf.push_back(message);
            evicted
        };
        self.inner.notify.notify_one();
        evicted
    }

    /// Close the queue. Queued messages are still drained; afterwards
    /// `recv` returns `None` and further pushes bounce back.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Receiver half of an [`OutboundQueue`]. Owned by the writer task.
pub struct OutboundDrain {
    inner: Arc<QueueInner>,
}

impl OutboundDrain {
    /// Wait for the next message. Returns `None` once the queue is closed
    /// and fully drained.
    pub async fn recv(&mut self) -> Option<String> {
        loop {
            // Register interest before checking the buffer so a push
            // between the check and the await cannot be missed.
            let notified = self.inner.notify.notified();
            if let Some(message) = self.inner.lock().pop_front() {
                return Some(message);
            }
            if self.inner.closed.load(Ordering::Acquire) {
                return None;
            }
            notified.await;
        }
    }
}
