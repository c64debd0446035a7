//! In-memory registry of live connections.
//!
//! Source of truth for "who is online now". Both indices
//! (`connection -> membership` and `room -> connections`) live behind one
//! mutex so they can never diverge; no lock is ever held across store I/O
//! or socket sends. Durable participant records are reconciled by the join
//! and leave use cases, not here.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Role, RoomCode, Timestamp, UserId};

/// One currently-connected client inside a room.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveConnection {
    pub id: ConnectionId,
    pub room: RoomCode,
    pub user: UserId,
    pub role: Role,
    pub connected_at: Timestamp,
}

/// Point-in-time view of one peer, as handed to joiners and broadcasts.
/// Membership may change immediately after the snapshot is taken; callers
/// re-query rather than hold on to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerSnapshot {
    pub connection: ConnectionId,
    pub user: UserId,
    pub role: Role,
    pub connected_at: Timestamp,
}

impl From<&LiveConnection> for PeerSnapshot {
    fn from(live: &LiveConnection) -> Self {
        Self {
            connection: live.id,
            user: live.user,
            role: live.role,
            connected_at: live.connected_at,
        }
    }
}

#[derive(Default)]
struct PresenceInner {
    connections: HashMap<ConnectionId, LiveConnection>,
    rooms: HashMap<RoomCode, HashSet<ConnectionId>>,
}

impl PresenceInner {
    fn detach(&mut self, connection: &ConnectionId) -> Option<LiveConnection> {
        let live = self.connections.remove(connection)?;
        if let Some(members) = self.rooms.get_mut(&live.room) {
            members.remove(connection);
            if members.is_empty() {
                self.rooms.remove(&live.room);
            }
        }
        Some(live)
    }
}

/// Mutex-guarded connection registry. A connection belongs to at most one
/// room at a time.
#[derive(Default)]
pub struct PresenceTracker {
    inner: Mutex<PresenceInner>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a live connection under its room group.
    ///
    /// Re-registering an already-registered connection first performs an
    /// implicit unregister of its prior membership, which is returned so
    /// the caller can reconcile it.
    pub async fn register(&self, live: LiveConnection) -> Option<LiveConnection> {
        let mut inner = self.inner.lock().await;
        let displaced = inner.detach(&live.id);
        inner
            .rooms
            .entry(live.room.clone())
            .or_default()
            .insert(live.id);
        inner.connections.insert(live.id, live);
        displaced
    }

    /// Remove a connection from its room group. Idempotent: unregistering
    /// an unknown connection returns `None` and changes nothing.
    pub async fn unregister(&self, connection: &ConnectionId) -> Option<LiveConnection> {
        self.inner.lock().await.detach(connection)
    }

    pub async fn get(&self, connection: &ConnectionId) -> Option<LiveConnection> {
        self.inner.lock().await.connections.get(connection).cloned()
    }

    /// Snapshot of a room's members, ordered by connect time, optionally
    /// excluding one connection (typically the caller's own).
    pub async fn list_peers(
        &self,
        room: &RoomCode,
        excluding: Option<&ConnectionId>,
    ) -> Vec<PeerSnapshot> {
        let inner = self.inner.lock().await;
        let Some(members) = inner.rooms.get(room) else {
            return Vec::new();
        };
        let excluding = excluding.copied();
        let mut peers: Vec<PeerSnapshot> = members
            .iter()
            .filter(|id| excluding != Some(**id))
            .filter_map(|id| inner.connections.get(id))
            .map(PeerSnapshot::from)
            .collect();
        peers.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.connection.to_string().cmp(&b.connection.to_string()))
        });
        peers
    }

    pub async fn connection_count(&self, room: &RoomCode) -> usize {
        self.inner
            .lock()
            .await
            .rooms
            .get(room)
            .map_or(0, HashSet::len)
    }

    /// Total live connections across all rooms. Used by tests to assert
    /// that no entries leak past a disconnect.
    pub async fn total_connections(&self) -> usize {
        self.inner.lock().await.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(code: &str) -> RoomCode {
        RoomCode::new(code.to_string()).unwrap()
    }

    fn live(id: ConnectionId, code: &str, user: i64, at: i64) -> LiveConnection {
        LiveConnection {
            id,
            room: room(code),
            user: UserId::new(user),
            role: Role::Interviewer,
            connected_at: Timestamp::new(at),
        }
    }

    #[tokio::test]
    async fn registered_connection_shows_up_in_its_room() {
        let tracker = PresenceTracker::new();
        let id = ConnectionId::generate();

        tracker.register(live(id, "R1", 1, 100)).await;

        assert_eq!(tracker.connection_count(&room("R1")).await, 1);
        let peers = tracker.list_peers(&room("R1"), None).await;
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].connection, id);
    }

    #[tokio::test]
    async fn list_peers_excludes_the_caller_and_orders_by_connect_time() {
        let tracker = PresenceTracker::new();
        let first = ConnectionId::generate();
        let second = ConnectionId::generate();
        let third = ConnectionId::generate();
        tracker.register(live(first, "R1", 1, 100)).await;
        tracker.register(live(second, "R1", 2, 200)).await;
        tracker.register(live(third, "R1", 3, 300)).await;

        let peers = tracker.list_peers(&room("R1"), Some(&second)).await;

        assert_eq!(peers.len(), 2);
        assert_eq!(peers[0].connection, first);
        assert_eq!(peers[1].connection, third);
    }

    #[tokio::test]
    async fn unregister_is_idempotent() {
        let tracker = PresenceTracker::new();
        let id = ConnectionId::generate();
        tracker.register(live(id, "R1", 1, 100)).await;

        assert!(tracker.unregister(&id).await.is_some());
        assert!(tracker.unregister(&id).await.is_none());

        assert_eq!(tracker.total_connections().await, 0);
        assert_eq!(tracker.connection_count(&room("R1")).await, 0);
    }

    #[tokio::test]
    async fn reregistering_moves_the_connection_between_rooms() {
        let tracker = PresenceTracker::new();
        let id = ConnectionId::generate();
        tracker.register(live(id, "R1", 1, 100)).await;

        let displaced = tracker.register(live(id, "R2", 1, 200)).await;

        assert_eq!(displaced.map(|d| d.room), Some(room("R1")));
        assert_eq!(tracker.connection_count(&room("R1")).await, 0);
        assert_eq!(tracker.connection_count(&room("R2")).await, 1);
        assert_eq!(tracker.total_connections().await, 1);
    }

    #[tokio::test]
    async fn empty_room_groups_are_dropped() {
        let tracker = PresenceTracker::new();
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();
        tracker.register(live(a, "R1", 1, 100)).await;
        tracker.register(live(b, "R1", 2, 200)).await;

        tracker.unregister(&a).await;
        tracker.unregister(&b).await;

        assert!(tracker.list_peers(&room("R1"), None).await.is_empty());
        assert_eq!(tracker.total_connections().await, 0);
    }

    #[tokio::test]
    async fn unknown_room_has_no_peers() {
        let tracker = PresenceTracker::new();

        assert!(tracker.list_peers(&room("nope"), None).await.is_empty());
        assert_eq!(tracker.connection_count(&room("nope")).await, 0);
    }
}
