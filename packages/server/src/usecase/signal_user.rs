//! UseCase: ターゲットシグナル送信
//!
//! 特定ユーザーの接続にだけイベントを送る。オフラインなら黙って捨てる（再送・キューイングなし）。

use std::sync::Arc;

use crate::domain::{OutboundEvent, SessionRegistry, TargetedSignal, UserId};

/// ターゲットシグナル送信のユースケース
pub struct SignalUserUseCase {
    session_registry: Arc<dyn SessionRegistry>,
}

impl SignalUserUseCase {
    pub fn new(session_registry: Arc<dyn SessionRegistry>) -> Self {
        Self { session_registry }
    }

    /// シグナルを送信する
    ///
    /// # Returns
    ///
    /// ライブ接続に渡せた場合は true
    pub async fn execute(&self, user_id: &UserId, signal: TargetedSignal) -> bool {
        let Some(connection) = self.session_registry.resolve(user_id).await else {
            tracing::debug!("Dropping '{}' for offline user '{}'", signal.event(), user_id);
            return false;
        };

        let event_name = signal.event().to_string();
        match connection.emit(OutboundEvent::Signal(signal)) {
            Ok(()) => {
                tracing::info!("Signal '{}' sent to '{}'", event_name, user_id);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to send signal '{}': {}", event_name, e);
                false
            }
        }
    }

    /// チャット一覧の再取得を促す
    pub async fn refetch_chats(&self, user_id: &UserId) -> bool {
        self.execute(user_id, TargetedSignal::refetch_chats()).await
    }
}
