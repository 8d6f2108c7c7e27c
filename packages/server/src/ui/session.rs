//! 接続ごとのインテント処理
//!
//! 1 本の接続に届いたインテントを到着順に 1 つずつ処理する。
//! `ConnectionState` はワーカーとハンドラーが共有する。ワーカーが途中で
//! 異常終了しても、ハンドラーは最後に記録されたルームで切断処理を行える。

use std::sync::Arc;

use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};

use crate::domain::{ConnectionState, Intent, OutboundEvent};

use super::state::AppState;

/// ワーカーとハンドラーが共有する接続状態
pub type SharedConnection = Arc<Mutex<ConnectionState>>;

pub struct ConnectionSession {
    state: Arc<AppState>,
    connection: SharedConnection,
}

impl ConnectionSession {
    pub fn new(state: Arc<AppState>, connection: ConnectionState) -> Self {
        Self {
            state,
            connection: Arc::new(Mutex::new(connection)),
        }
    }

    pub fn connection(&self) -> SharedConnection {
        self.connection.clone()
    }

    /// キューが閉じるまでインテントを処理する
    pub async fn run(self, mut intents: mpsc::UnboundedReceiver<Intent>) {
        while let Some(intent) = intents.recv().await {
            let mut connection = self.connection.lock().await;
            apply(&self.state, &mut connection, intent).await;
        }
    }
}

async fn apply(state: &AppState, connection: &mut ConnectionState, intent: Intent) {
    let result = match intent {
        Intent::GoIdle => {
            state.disconnect_session_usecase.go_idle(connection).await;
            Ok(())
        }
        Intent::JoinChatRoom(chat_id) => state
            .join_chat_room_usecase
            .execute(connection, chat_id)
            .await
            .map_err(|e| e.to_string()),
        Intent::LeaveChatRoom(chat_id) => {
            state
                .leave_chat_room_usecase
                .execute(connection, &chat_id)
                .await;
            Ok(())
        }
        Intent::SendMessage(outgoing) => state
            .send_message_usecase
            .execute(connection.user_id(), outgoing)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
    };

    if let Err(message) = result {
        reject(connection, message);
    }
}

/// 拒否したインテントの理由を、この接続にだけ返す
fn reject(connection: &ConnectionState, message: String) {
    tracing::info!("Rejected intent from '{}': {}", connection.user_id(), message);
    if let Err(e) = connection.handle().emit(OutboundEvent::error(message)) {
        tracing::warn!("Failed to report error: {}", e);
    }
}

/// ワーカーの終了を待ち、最後に記録された接続状態で切断処理を行う
///
/// 切断は「現在のルームからの退室 + 登録解除」。
pub async fn close_session(
    state: &AppState,
    worker: JoinHandle<()>,
    connection: SharedConnection,
) {
    if let Err(e) = worker.await {
        let connection = connection.lock().await;
        tracing::error!(
            "Intent worker for '{}' failed, closing from its last state: {}",
            connection.user_id(),
            e
        );
    }

    let connection = connection.lock().await.clone();
    state.disconnect_session_usecase.execute(connection).await;
}
