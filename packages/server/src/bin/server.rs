//! Interview-room coordination server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin greenroom-server
//! cargo run --bin greenroom-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use greenroom_server::{
    infrastructure::{
        document::DocumentStore, identity::JwtIdentityProvider,
        message_pusher::WebSocketMessagePusher, notifier::LogNotifier, presence::PresenceTracker,
        repository::InMemoryRoomStore,
    },
    ui::Server,
    ui::state::{AppState, CoordinatorConfig},
    usecase::{
        DeleteRoomUseCase, GetRoomDetailUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        ListRoomsUseCase, RelaySignalUseCase, RescheduleRoomUseCase, ScheduleRoomUseCase,
        SubmitFeedbackUseCase, TransitionRoomUseCase, UpdateDocumentUseCase,
    },
};
use greenroom_shared::logger::setup_logger;
use greenroom_shared::time::SystemClock;

const DEV_JWT_SECRET: &str = "insecure-dev-secret";

#[derive(Parser, Debug)]
#[command(name = "greenroom-server")]
#[command(about = "Live interview-room coordination server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// HS256 secret used to verify session tokens
    #[arg(long, default_value = DEV_JWT_SECRET)]
    jwt_secret: String,

    /// Seconds an empty room keeps its in-memory document snapshot
    #[arg(long, default_value = "60")]
    snapshot_grace_secs: u64,

    /// Per-connection outbound queue capacity
    #[arg(long, default_value = "64")]
    outbound_capacity: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    if args.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("Running with the built-in development JWT secret");
    }

    // Wire dependencies in order: store and trackers, collaborators,
    // use cases, then the server.
    let store = Arc::new(InMemoryRoomStore::new());
    let presence = Arc::new(PresenceTracker::new());
    let documents = Arc::new(DocumentStore::new());
    let pusher = Arc::new(WebSocketMessagePusher::new());
    let identity = Arc::new(JwtIdentityProvider::new(args.jwt_secret.clone()));
    let notifier = Arc::new(LogNotifier::new());
    let clock = Arc::new(SystemClock);

    let state = Arc::new(AppState {
        schedule_room: Arc::new(ScheduleRoomUseCase::new(
            store.clone(),
            notifier.clone(),
            clock.clone(),
        )),
        reschedule_room: Arc::new(RescheduleRoomUseCase::new(store.clone(), notifier.clone())),
        transition_room: Arc::new(TransitionRoomUseCase::new(
            store.clone(),
            notifier.clone(),
            clock.clone(),
        )),
        delete_room: Arc::new(DeleteRoomUseCase::new(store.clone(), notifier.clone())),
        join_room: Arc::new(JoinRoomUseCase::new(
            store.clone(),
            presence.clone(),
            documents.clone(),
            pusher.clone(),
            clock.clone(),
        )),
        leave_room: Arc::new(LeaveRoomUseCase::new(
            store.clone(),
            presence.clone(),
            pusher.clone(),
            clock.clone(),
        )),
        relay_signal: Arc::new(RelaySignalUseCase::new(presence.clone(), pusher.clone())),
        update_document: Arc::new(UpdateDocumentUseCase::new(
            presence.clone(),
            documents.clone(),
            pusher.clone(),
            clock.clone(),
        )),
        submit_feedback: Arc::new(SubmitFeedbackUseCase::new(store.clone(), clock.clone())),
        list_rooms: Arc::new(ListRoomsUseCase::new(store.clone())),
        room_detail: Arc::new(GetRoomDetailUseCase::new(store.clone(), presence.clone())),
        identity,
        documents,
        presence,
        config: CoordinatorConfig {
            snapshot_grace: Duration::from_secs(args.snapshot_grace_secs),
            outbound_capacity: args.outbound_capacity,
        },
    });

    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
