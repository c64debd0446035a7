//! WebSocket event vocabulary.
//!
//! A fixed, enumerated set of message kinds with typed payloads; unknown
//! or malformed messages are logged and ignored by the handler. Signal
//! payloads (SDP offers/answers, ICE candidates) pass through as opaque
//! JSON — the coordinator relays the handshake metadata, it never
//! interprets it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ConnectionId, Role};

/// Call-negotiation message kinds relayed between peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

/// Messages a client may send after joining a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Relay call-negotiation metadata to one specific peer.
    Signal {
        kind: SignalKind,
        payload: Value,
        to: ConnectionId,
    },
    /// Replace the shared editor content for the whole room.
    DocumentEdit { content: String, language: String },
    /// Graceful exit; the server cleans up and closes the socket.
    Leave,
}

/// One peer as presented to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerDto {
    pub connection_id: ConnectionId,
    pub user_id: i64,
    pub role: Role,
}

/// Messages the coordinator sends to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Sent once to a joiner: its own connection id plus the current peers.
    Peers {
        connection_id: ConnectionId,
        peers: Vec<PeerDto>,
    },
    PeerJoined {
        connection_id: ConnectionId,
        user_id: i64,
        role: Role,
    },
    PeerLeft {
        connection_id: ConnectionId,
        user_id: i64,
    },
    Signal {
        kind: SignalKind,
        payload: Value,
        from: ConnectionId,
    },
    /// Shared editor content changed. `from` is absent when the snapshot
    /// is replayed to a late joiner.
    DocumentUpdated {
        content: String,
        language: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<ConnectionId>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_signal_deserializes_with_opaque_payload() {
        let raw = r#"{
            "type": "signal",
            "kind": "offer",
            "payload": {"sdp": "v=0...", "type": "offer"},
            "to": "7a6f1d2e-3b4c-4d5e-8f90-123456789abc"
        }"#;

        let event: ClientEvent = serde_json::from_str(raw).unwrap();

        match event {
            ClientEvent::Signal { kind, payload, .. } => {
                assert_eq!(kind, SignalKind::Offer);
                assert_eq!(payload["sdp"], json!("v=0..."));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn leave_is_a_bare_tagged_message() {
        let event: ClientEvent = serde_json::from_str(r#"{"type": "leave"}"#).unwrap();

        assert!(matches!(event, ClientEvent::Leave));
    }

    #[test]
    fn unknown_event_types_fail_to_parse() {
        assert!(serde_json::from_str::<ClientEvent>(r#"{"type": "eval", "code": "rm -rf"}"#).is_err());
    }

    #[test]
    fn server_events_tag_with_snake_case_type() {
        let event = ServerEvent::PeerLeft {
            connection_id: ConnectionId::generate(),
            user_id: 7,
        };

        let value: Value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], json!("peer_left"));
        assert_eq!(value["user_id"], json!(7));
    }

    #[test]
    fn replayed_document_update_omits_the_from_field() {
        let event = ServerEvent::DocumentUpdated {
            content: "fn main() {}".to_string(),
            language: "rust".to_string(),
            from: None,
        };

        let value: Value = serde_json::to_value(&event).unwrap();

        assert!(value.get("from").is_none());
    }

    #[test]
    fn signal_kind_uses_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&SignalKind::IceCandidate).unwrap(),
            "\"ice_candidate\""
        );
    }
}
