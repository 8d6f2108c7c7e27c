//! UseCase: ルーム退室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveChatRoomUseCase::execute() / leave_room() メソッド
//! - Tracker からの削除と、残った在室者への `left` ブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：在室中のルームから退室
//! - エッジケース：在室していないルームからの退室（冪等）
//! - エッジケース：接続が別のルームに記録されている場合（記録は変えない）
//! - エッジケース：同じユーザーの別接続が在室している場合（left は送らない）

use std::sync::Arc;

use crate::domain::{
    ChatId, ConnectionId, ConnectionState, OutboundEvent, RoomPresenceTracker, SessionRegistry,
    UserId,
};

/// ルーム退室のユースケース
pub struct LeaveChatRoomUseCase {
    room_presence: Arc<dyn RoomPresenceTracker>,
    session_registry: Arc<dyn SessionRegistry>,
}

impl LeaveChatRoomUseCase {
    pub fn new(
        room_presence: Arc<dyn RoomPresenceTracker>,
        session_registry: Arc<dyn SessionRegistry>,
    ) -> Self {
        Self {
            room_presence,
            session_registry,
        }
    }

    /// `leave-chat-room` インテントを処理する
    ///
    /// 接続に記録されたルームは、それが `chat_id` の場合のみクリアする。
    ///
    /// # Returns
    ///
    /// ユーザーが在室者から外れた場合は true
    pub async fn execute(&self, state: &mut ConnectionState, chat_id: &ChatId) -> bool {
        state.leave_room(chat_id);
        self.leave_room(state.user_id(), state.handle().id(), chat_id)
            .await
    }

    /// Tracker から接続を外し、ユーザーが在室者でなくなったら残った在室者に `left` を送る
    ///
    /// 接続が在室していなかった場合、または同じユーザーの別接続がまだ在室している場合は
    /// 通知しない。
    pub async fn leave_room(
        &self,
        user_id: &UserId,
        connection_id: ConnectionId,
        chat_id: &ChatId,
    ) -> bool {
        if !self
            .room_presence
            .leave(chat_id, user_id, connection_id)
            .await
        {
            tracing::debug!(
                "Connection {} of '{}' left room '{}' without changing its occupants",
                connection_id,
                user_id,
                chat_id
            );
            return false;
        }

        let remaining: Vec<UserId> = self
            .room_presence
            .occupants(chat_id)
            .await
            .into_iter()
            .collect();
        let event = OutboundEvent::Left {
            user_id: user_id.clone(),
            chat_id: chat_id.clone(),
        };
        let delivered = self.session_registry.broadcast(&remaining, event).await;
        tracing::info!(
            "'{}' left room '{}' (notified {} occupants)",
            user_id,
            chat_id,
            delivered
        );
        true
    }
}
