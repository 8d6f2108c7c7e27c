//! WebSocket connection handlers.
//!
//! 1 本の接続は 3 つのタスクで動く。
//!
//! - reader: 受信フレームを `Intent` に変換してキューに積む
//! - worker: キューのインテントを順番に処理する（`ConnectionSession`）。
//!   接続状態はハンドラーと共有し、worker の終了後にその状態で切断処理を行う
//! - pusher: 接続宛ての `OutboundEvent` をフレームにしてソケットへ書く

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use serde::Deserialize;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionHandle, Intent, OutboundEvent, UserId},
    infrastructure::dto::websocket::{ClientFrame, ServerFrame},
    ui::{
        session::{self, ConnectionSession},
        state::AppState,
    },
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // 認証に失敗した接続はどのコンポーネントにも入れない
    let user_id = match state
        .connect_session_usecase
        .authenticate(query.token.as_deref())
    {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id)))
}

/// Spawns a task that drains the connection's event channel into the WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundEvent>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match ServerFrame::try_from(event).and_then(|frame| serde_json::to_string(&frame)) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize outbound event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Spawns a task that parses inbound frames and queues them as intents.
///
/// 解釈できないフレームはこの接続に `error` を返して読み捨てる。
fn reader_loop(
    mut receiver: SplitStream<WebSocket>,
    intents: mpsc::UnboundedSender<Intent>,
    connection: ConnectionHandle,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match parse_intent(&text) {
                    Ok(intent) => {
                        if intents.send(intent).is_err() {
                            break;
                        }
                    }
                    Err(reason) => {
                        tracing::warn!(
                            "Invalid frame from '{}': {}",
                            connection.user_id(),
                            reason
                        );
                        if connection.emit(OutboundEvent::error(reason)).is_err() {
                            break;
                        }
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection.user_id());
                    break;
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", connection.user_id());
                }
                _ => {}
            }
        }
    })
}

fn parse_intent(text: &str) -> Result<Intent, String> {
    let frame = serde_json::from_str::<ClientFrame>(text)
        .map_err(|e| format!("invalid frame: {}", e))?;
    Intent::try_from(frame).map_err(|e| format!("invalid frame: {}", e))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: UserId) {
    let (sender, receiver) = socket.split();

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let connection = state
        .connect_session_usecase
        .execute(user_id, event_tx)
        .await;
    let handle = connection.handle().clone();

    let (intent_tx, intent_rx) = mpsc::unbounded_channel();
    let mut send_task = pusher_loop(event_rx, sender);
    let mut recv_task = reader_loop(receiver, intent_tx, handle);
    let session = ConnectionSession::new(state.clone(), connection);
    let connection = session.connection();
    let worker = tokio::spawn(session.run(intent_rx));

    // ソケットのどちらかが閉じたら reader を止める。
    // reader が止まるとインテントのキューが閉じ、worker は残りを処理して終了する。
    tokio::select! {
        _ = &mut recv_task => {}
        _ = &mut send_task => recv_task.abort(),
    };

    session::close_session(&state, worker, connection).await;
    send_task.abort();
}
