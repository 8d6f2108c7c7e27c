//! UseCase: セッション切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() / go_idle() メソッド
//! - 切断時の暗黙の退室と Session Registry からの登録解除
//!
//! ### なぜこのテストが必要か
//! - 切断は「現在のルームからの退室 + 登録解除」と同じでなければならない
//! - 置き換え済みの古い接続が切断しても、新しい接続の登録を消してはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：在室中の接続の切断
//! - 正常系：`leave` インテントによる登録解除（接続は維持）
//! - エッジケース：再接続で置き換えられた古い接続の切断
//! - エッジケース：同じルームを開いた 2 つのタブのうち古い方の切断（ユーザーは在室のまま）

use std::sync::Arc;

use crate::domain::{ConnectionState, SessionRegistry};

use super::leave_chat_room::LeaveChatRoomUseCase;

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    leave_chat_room: Arc<LeaveChatRoomUseCase>,
    session_registry: Arc<dyn SessionRegistry>,
}

impl DisconnectSessionUseCase {
    pub fn new(
        leave_chat_room: Arc<LeaveChatRoomUseCase>,
        session_registry: Arc<dyn SessionRegistry>,
    ) -> Self {
        Self {
            leave_chat_room,
            session_registry,
        }
    }

    /// 接続の終了処理を実行
    ///
    /// 接続の状態を消費する。以降この接続にはイベントが送られない。
    pub async fn execute(&self, mut state: ConnectionState) {
        self.go_idle(&state).await;
        if let Some(chat_id) = state.take_room() {
            self.leave_chat_room
                .leave_room(state.user_id(), state.handle().id(), &chat_id)
                .await;
        }
        tracing::info!(
            "Session for '{}' disconnected ({})",
            state.user_id(),
            state.handle().id()
        );
    }

    /// `leave` インテント: 接続を開いたまま Session Registry から外す
    ///
    /// # Returns
    ///
    /// この接続が登録されていた場合は true
    pub async fn go_idle(&self, state: &ConnectionState) -> bool {
        self.session_registry
            .unregister_connection(state.user_id(), state.handle().id())
            .await
    }
}
