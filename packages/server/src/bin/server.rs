//! Chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chat-relay-server -- --jwt-secret dev-secret
//! cargo run --bin chat-relay-server -- --jwt-secret dev-secret --seed demos/seed.json --port 3000
//! ```

use std::{path::PathBuf, sync::Arc};

use chat_relay_server::{
    infrastructure::{
        auth::JwtTokenVerifier,
        repository::{InMemoryChatStore, InMemoryRoomPresenceTracker},
        seed::SeedData,
        session_registry::InMemorySessionRegistry,
    },
    ui::{Server, state::AppState},
    usecase::{
        ConnectSessionUseCase, DisconnectSessionUseCase, GetPresenceSnapshotUseCase,
        JoinChatRoomUseCase, LeaveChatRoomUseCase, SendMessageUseCase, SignalUserUseCase,
    },
};
use chat_relay_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chat-relay-server")]
#[command(about = "Real-time chat presence and delivery relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "RELAY_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "RELAY_PORT", default_value = "8080")]
    port: u16,

    /// HS256 secret used to verify connection tokens
    #[arg(long, env = "RELAY_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// JSON file with users and chats to preload into the in-memory store
    #[arg(long, env = "RELAY_SEED")]
    seed: Option<PathBuf>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "RELAY_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Collaborators (chat store, token verifier)
    // 2. Registry and tracker
    // 3. UseCases
    // 4. Server

    // 1. Create collaborators
    let chat_store = match &args.seed {
        Some(path) => match SeedData::from_file(path).and_then(SeedData::into_store) {
            Ok(store) => {
                tracing::info!("Loaded seed data from {}", path.display());
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!("Failed to load seed data from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Arc::new(InMemoryChatStore::new()),
    };
    let token_verifier = Arc::new(JwtTokenVerifier::new(&args.jwt_secret));

    // 2. Create registry and tracker
    let session_registry = Arc::new(InMemorySessionRegistry::new());
    let room_presence = Arc::new(InMemoryRoomPresenceTracker::new());

    // 3. Create UseCases
    let leave_chat_room_usecase = Arc::new(LeaveChatRoomUseCase::new(
        room_presence.clone(),
        session_registry.clone(),
    ));
    let app_state = AppState {
        connect_session_usecase: Arc::new(ConnectSessionUseCase::new(
            token_verifier,
            session_registry.clone(),
        )),
        disconnect_session_usecase: Arc::new(DisconnectSessionUseCase::new(
            leave_chat_room_usecase.clone(),
            session_registry.clone(),
        )),
        join_chat_room_usecase: Arc::new(JoinChatRoomUseCase::new(
            chat_store.clone(),
            chat_store.clone(),
            room_presence.clone(),
            session_registry.clone(),
            leave_chat_room_usecase.clone(),
        )),
        leave_chat_room_usecase,
        send_message_usecase: Arc::new(SendMessageUseCase::new(
            chat_store.clone(),
            chat_store,
            room_presence.clone(),
            session_registry.clone(),
            Arc::new(SystemClock),
        )),
        signal_user_usecase: Arc::new(SignalUserUseCase::new(session_registry.clone())),
        get_presence_snapshot_usecase: Arc::new(GetPresenceSnapshotUseCase::new(
            session_registry,
            room_presence,
        )),
    };

    // 4. Create and run the server
    let server = Server::new(app_state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
