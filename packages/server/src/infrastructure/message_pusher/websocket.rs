//! WebSocket-backed MessagePusher implementation.
//!
//! Owns the map from connection to its bounded outbound queue. The
//! WebSocket handler creates the queue pair, hands the sender half here
//! and drains the other half into the socket from its writer task. This
//! keeps "who can be reached" and "how bytes leave the process" in one
//! place without the pusher ever touching a socket directly.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, OutboundQueue};

/// Registry of live outbound queues, keyed by connection.
#[derive(Default)]
pub struct WebSocketMessagePusher {
    clients: Mutex<HashMap<ConnectionId, OutboundQueue>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, connection: ConnectionId, queue: OutboundQueue) {
        let mut clients = self.clients.lock().await;
        if let Some(previous) = clients.insert(connection, queue) {
            previous.close();
            tracing::debug!("Replaced outbound queue for connection '{}'", connection);
        }
        tracing::debug!("Connection '{}' registered for outbound delivery", connection);
    }

    async fn unregister_connection(&self, connection: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if let Some(queue) = clients.remove(connection) {
            queue.close();
            tracing::debug!("Connection '{}' unregistered from outbound delivery", connection);
        }
    }

    async fn push_to(
        &self,
        connection: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let Some(queue) = clients.get(connection) else {
            return Err(MessagePushError::ConnectionNotFound(connection.to_string()));
        };
        if queue.push(content.to_string()).is_some() {
            tracing::warn!(
                "Outbound queue full for connection '{}'; dropped oldest message",
                connection
            );
        }
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        for target in targets {
            let Some(queue) = clients.get(&target) else {
                // races with disconnects are expected traffic, not faults
                tracing::debug!("Skipping vanished connection '{}' during broadcast", target);
                continue;
            };
            if queue.push(content.to_string()).is_some() {
                tracing::warn!(
                    "Outbound queue full for connection '{}'; dropped oldest message",
                    target
                );
            }
        }
        Ok(())
    }
}
