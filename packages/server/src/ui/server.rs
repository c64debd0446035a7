//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::handler::{
    delete_room, get_room_detail, get_rooms, health_check, reschedule_room, schedule_room,
    submit_feedback, transition_room, websocket_handler,
};
use super::signal::shutdown_signal;
use super::state::AppState;

/// Build the coordinator's router. Exposed separately from [`Server::run`]
/// so tests can serve it on an ephemeral port.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // live room protocol
        .route("/ws", get(websocket_handler))
        // scheduling / admin surface
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms).post(schedule_room))
        .route(
            "/api/rooms/{code}",
            get(get_room_detail)
                .patch(reschedule_room)
                .delete(delete_room),
        )
        .route("/api/rooms/{code}/status", post(transition_room))
        .route("/api/rooms/{code}/feedback", post(submit_feedback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Interview-room coordination server.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Run the server until ctrl-c/SIGTERM.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(self.state);

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Interview-room coordinator listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws?room=<code>&token=<jwt>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
