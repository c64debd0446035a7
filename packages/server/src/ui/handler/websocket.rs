//! WebSocket connection handler: the live room protocol.
//!
//! Joining is expressed by opening the socket with `room` and `token`
//! query parameters. Authorization runs before the upgrade (read-only, so
//! a rejected join mutates nothing and maps to a plain HTTP status);
//! registration runs after the upgrade, inside `handle_socket`, whose exit
//! path always funnels through `finalize_leave` — graceful `leave` events
//! and abnormal disconnects share the same idempotent cleanup.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;

use crate::domain::{ConnectionId, OutboundDrain, OutboundQueue, RoomCode};
use crate::infrastructure::document::schedule_discard;
use crate::infrastructure::dto::websocket::{ClientEvent, PeerDto, ServerEvent};
use crate::usecase::{JoinAuthorization, JoinError};

use super::super::state::AppState;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub room: String,
    pub token: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let identity = state
        .identity
        .current_identity(&query.token)
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let code = RoomCode::new(query.room).map_err(|_| StatusCode::BAD_REQUEST)?;

    // Read-only authorization before the upgrade: a rejected join must not
    // mutate state or notify peers.
    let auth = match state.join_room.authorize(&code, &identity).await {
        Ok(auth) => auth,
        Err(JoinError::Unauthorized) => {
            tracing::warn!(
                "User {} is not authorized for room '{}'",
                identity.user_id,
                code
            );
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(JoinError::RoomNotFound) => return Err(StatusCode::NOT_FOUND),
        Err(JoinError::RoomClosed) => {
            tracing::warn!("Rejecting join to cancelled room '{}'", code);
            return Err(StatusCode::FORBIDDEN);
        }
        Err(JoinError::Store(e)) => {
            tracing::error!("Store failure while authorizing join: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, auth)))
}

/// Drain the outbound queue into the socket. Ends when the queue closes
/// (unregistration) or the socket goes away.
async fn pusher_loop(
    mut drain: OutboundDrain,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) {
    while let Some(msg) = drain.recv().await {
        if sender.send(Message::Text(msg.into())).await.is_err() {
            break;
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, auth: JoinAuthorization) {
    let connection = ConnectionId::generate();
    let (queue, drain) = OutboundQueue::bounded(state.config.outbound_capacity);

    let outcome = match state.join_room.register(connection, &auth, queue).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(
                "Failed to register connection '{}' in room '{}': {}",
                connection,
                auth.room.code,
                e
            );
            return;
        }
    };
    let room_code = auth.room.code.clone();
    let user_id = auth.participant.user;

    let (mut sender, mut receiver) = socket.split();

    // Send the current peer list (and the joiner's own connection id)
    // before anything else can reach the socket.
    let peers_event = ServerEvent::Peers {
        connection_id: connection,
        peers: outcome.peers.iter().map(PeerDto::from).collect(),
    };
    let peers_json = serde_json::to_string(&peers_event).unwrap();
    if sender.send(Message::Text(peers_json.into())).await.is_err() {
        tracing::error!("Failed to send peer list to '{}'", connection);
        finalize_leave(&state, &connection).await;
        return;
    }

    // Replay the current editor snapshot so a late joiner sees the latest
    // content immediately.
    if let Some(snapshot) = outcome.snapshot {
        let replay = ServerEvent::DocumentUpdated {
            content: snapshot.content,
            language: snapshot.language,
            from: None,
        };
        let replay_json = serde_json::to_string(&replay).unwrap();
        if sender.send(Message::Text(replay_json.into())).await.is_err() {
            tracing::error!("Failed to replay document snapshot to '{}'", connection);
            finalize_leave(&state, &connection).await;
            return;
        }
    }

    // Announce the joiner to everyone already in the room.
    let joined_event = ServerEvent::PeerJoined {
        connection_id: connection,
        user_id: user_id.value(),
        role: outcome.role,
    };
    let joined_json = serde_json::to_string(&joined_event).unwrap();
    state
        .join_room
        .broadcast_peer_joined(&room_code, &connection, &joined_json)
        .await;

    // Inbound: client events until leave/close/error.
    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", connection, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(ClientEvent::Signal { kind, payload, to }) => {
                        let event = ServerEvent::Signal {
                            kind,
                            payload,
                            from: connection,
                        };
                        let json = serde_json::to_string(&event).unwrap();
                        recv_state.relay_signal.execute(&connection, &to, &json).await;
                    }
                    Ok(ClientEvent::DocumentEdit { content, language }) => {
                        let event = ServerEvent::DocumentUpdated {
                            content: content.clone(),
                            language: language.clone(),
                            from: Some(connection),
                        };
                        let json = serde_json::to_string(&event).unwrap();
                        if let Err(e) = recv_state
                            .update_document
                            .execute(&connection, content, language, json)
                            .await
                        {
                            tracing::warn!("Rejected document edit from '{}': {}", connection, e);
                        }
                    }
                    Ok(ClientEvent::Leave) => {
                        tracing::info!("Connection '{}' requested leave", connection);
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring malformed message from '{}': {}", connection, e);
                    }
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Outbound: everything queued for this connection.
    let mut send_task = tokio::spawn(pusher_loop(drain, sender));

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    finalize_leave(&state, &connection).await;
}

/// Unregister the connection (idempotently), tell the remaining members,
/// and start the snapshot-discard timer when the room just became empty.
async fn finalize_leave(state: &Arc<AppState>, connection: &ConnectionId) {
    let Some(outcome) = state.leave_room.execute(connection).await else {
        return;
    };

    let left_event = ServerEvent::PeerLeft {
        connection_id: outcome.connection.id,
        user_id: outcome.connection.user.value(),
    };
    let left_json = serde_json::to_string(&left_event).unwrap();
    state
        .leave_room
        .broadcast_peer_left(outcome.notify_targets, &left_json)
        .await;

    if outcome.remaining == 0 {
        schedule_discard(
            state.documents.clone(),
            state.presence.clone(),
            outcome.connection.room.clone(),
            state.config.snapshot_grace,
        );
    }
}
