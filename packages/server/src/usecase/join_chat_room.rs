//! UseCase: ルーム入室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatRoomUseCase::execute() メソッド
//! - メンバーシップ検証、Tracker への追加、`joined` ブロードキャスト、既読化
//!
//! ### なぜこのテストが必要か
//! - Tracker に入るユーザーは必ずメンバーシップ検証を通過していること
//! - 1 接続 1 ルームの不変条件（別ルームへの入室で前のルームから抜ける）
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーの入室（自分を含む在室者に joined が届く）
//! - 異常系：非メンバー・存在しないチャット・Oracle の障害
//! - エッジケース：別ルームからの移動、既読化の失敗（入室は取り消さない）

use std::sync::Arc;

use crate::domain::{
    ChatId, ConnectionState, MembershipOracle, MessageStore, OutboundEvent, RepositoryError,
    RoomPresenceTracker, SessionRegistry, UserId,
};

use super::{error::JoinRoomError, leave_chat_room::LeaveChatRoomUseCase};

/// ルーム入室のユースケース
pub struct JoinChatRoomUseCase {
    /// MembershipOracle（メンバーシップの正）
    membership_oracle: Arc<dyn MembershipOracle>,
    /// MessageStore（既読化の委譲先）
    message_store: Arc<dyn MessageStore>,
    room_presence: Arc<dyn RoomPresenceTracker>,
    session_registry: Arc<dyn SessionRegistry>,
    /// 別ルームからの移動時に使う退室処理
    leave_chat_room: Arc<LeaveChatRoomUseCase>,
}

impl JoinChatRoomUseCase {
    pub fn new(
        membership_oracle: Arc<dyn MembershipOracle>,
        message_store: Arc<dyn MessageStore>,
        room_presence: Arc<dyn RoomPresenceTracker>,
        session_registry: Arc<dyn SessionRegistry>,
        leave_chat_room: Arc<LeaveChatRoomUseCase>,
    ) -> Self {
        Self {
            membership_oracle,
            message_store,
            room_presence,
            session_registry,
            leave_chat_room,
        }
    }

    /// `join-chat-room` インテントを処理する
    ///
    /// # Errors
    ///
    /// メンバーシップを確認できない場合は状態を一切変更せずにエラーを返す。
    pub async fn execute(
        &self,
        state: &mut ConnectionState,
        chat_id: ChatId,
    ) -> Result<(), JoinRoomError> {
        let user_id = state.user_id().clone();
        let connection_id = state.handle().id();

        // 1. メンバーシップ検証
        self.authorize(&chat_id, &user_id).await?;

        // 2. 接続のルームを更新（別ルームにいたら先に退室）
        if let Some(previous) = state.enter_room(chat_id.clone()) {
            self.leave_chat_room
                .leave_room(&user_id, connection_id, &previous)
                .await;
        }

        // 3. Tracker に追加し、自分を含む在室者に通知
        self.room_presence
            .join(&chat_id, &user_id, connection_id)
            .await;
        let occupants: Vec<UserId> = self
            .room_presence
            .occupants(&chat_id)
            .await
            .into_iter()
            .collect();
        let event = OutboundEvent::Joined {
            user_id: user_id.clone(),
            chat_id: chat_id.clone(),
        };
        let delivered = self.session_registry.broadcast(&occupants, event).await;
        tracing::info!(
            "'{}' joined room '{}' (notified {} occupants)",
            user_id,
            chat_id,
            delivered
        );

        // 4. 既読化（失敗しても入室は取り消さない）
        match self.message_store.mark_all_read(&chat_id, &user_id).await {
            Ok(count) => {
                tracing::debug!("Marked {} messages as read in '{}'", count, chat_id);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to mark messages as read in '{}' for '{}': {}",
                    chat_id,
                    user_id,
                    e
                );
            }
        }

        Ok(())
    }

    async fn authorize(&self, chat_id: &ChatId, user_id: &UserId) -> Result<(), JoinRoomError> {
        match self.membership_oracle.is_member(chat_id, user_id).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::warn!("'{}' tried to join '{}' without membership", user_id, chat_id);
                Err(JoinRoomError::NotMember(chat_id.clone()))
            }
            Err(RepositoryError::ChatNotFound(_)) => {
                Err(JoinRoomError::ChatNotFound(chat_id.clone()))
            }
            Err(e) => {
                tracing::error!("Membership lookup for '{}' failed: {}", chat_id, e);
                Err(JoinRoomError::MembershipUnavailable(e))
            }
        }
    }
}
