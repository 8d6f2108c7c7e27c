//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 在室チェック、既読状態の決定、永続化、接続中メンバー全員へのファンアウト
//!
//! ### なぜこのテストが必要か
//! - 既読状態は「送信時点の在室者数が 2 以上か」だけで決まる
//! - 配信先はルームの在室者ではなくチャットのメンバー（チャット一覧の更新のため）
//! - 永続化の失敗は送信者にエラーとして返し、誰にも配信しない
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 人在室（read=false）、2 人在室（read=true）
//! - 正常系：ルーム外のメンバーにも message とプレビューが届く
//! - 異常系：未入室での送信、空メッセージ、永続化の失敗、メンバー取得の失敗
//! - エッジケース：接続中のメンバーがいない

use std::sync::Arc;

use chat_relay_shared::time::Clock;

use crate::domain::{
    ChatPreview, EnrichedMessage, MembershipOracle, MessageStore, NewMessage, OutboundEvent,
    OutgoingMessage, RoomPresenceTracker, SessionRegistry, Timestamp, UserId,
};

use super::error::SendMessageError;

/// 送信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// 永続化されたメッセージ
    pub message: EnrichedMessage,
    /// message イベントを届けた接続の数
    pub delivered_to: usize,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    membership_oracle: Arc<dyn MembershipOracle>,
    message_store: Arc<dyn MessageStore>,
    room_presence: Arc<dyn RoomPresenceTracker>,
    session_registry: Arc<dyn SessionRegistry>,
    /// 送信時刻の取得元（テストでは固定時刻を注入する）
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        membership_oracle: Arc<dyn MembershipOracle>,
        message_store: Arc<dyn MessageStore>,
        room_presence: Arc<dyn RoomPresenceTracker>,
        session_registry: Arc<dyn SessionRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            membership_oracle,
            message_store,
            room_presence,
            session_registry,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender_id` - 送信者（接続の持ち主）
    /// * `outgoing` - 送信内容と送信種別
    ///
    /// # Returns
    ///
    /// * `Ok(SendOutcome)` - 永続化済みのメッセージと配信数
    /// * `Err(SendMessageError)` - 送信者に `error` として返すべき失敗
    pub async fn execute(
        &self,
        sender_id: &UserId,
        outgoing: OutgoingMessage,
    ) -> Result<SendOutcome, SendMessageError> {
        if outgoing.is_empty() {
            return Err(SendMessageError::EmptyMessage);
        }

        // 1. 送信者がルームに在室しているか
        let chat_id = outgoing.chat_id.clone();
        if !self.room_presence.contains(&chat_id, sender_id).await {
            tracing::warn!("'{}' sent to '{}' without joining", sender_id, chat_id);
            return Err(SendMessageError::NotInRoom(chat_id));
        }

        // 2. 既読状態は送信時点の在室者数で決まる
        let read = self.room_presence.occupant_count(&chat_id).await >= 2;

        // 3. 永続化
        let new_message = NewMessage {
            chat_id: chat_id.clone(),
            sender_id: sender_id.clone(),
            content: outgoing.content,
            attachments: outgoing.attachments,
            read,
            created_at: Timestamp::new(self.clock.now_millis()),
        };
        let message = self
            .message_store
            .create_message(new_message)
            .await
            .map_err(|e| {
                tracing::error!("Failed to persist message for '{}': {}", chat_id, e);
                SendMessageError::PersistFailed(e)
            })?;

        // 4. 配信先はチャットの接続中メンバー全員
        let members = self
            .membership_oracle
            .members_of(&chat_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to resolve members of '{}': {}", chat_id, e);
                SendMessageError::DeliveryFailed(e)
            })?;
        let connections = self.session_registry.resolve_many(&members).await;
        if connections.is_empty() {
            tracing::debug!("No connected members for '{}'", chat_id);
            return Ok(SendOutcome {
                message,
                delivered_to: 0,
            });
        }

        // 5. ファンアウト（message → チャット一覧プレビュー の順）
        let preview = ChatPreview::for_message(&message, &outgoing.kind);
        let mut delivered_to = 0;
        for connection in &connections {
            if let Err(e) = connection.emit(OutboundEvent::Message(Box::new(message.clone()))) {
                tracing::warn!("Skipping delivery to '{}': {}", connection.user_id(), e);
                continue;
            }
            delivered_to += 1;
            if let Err(e) = connection.emit(OutboundEvent::ChatPreview(preview.clone())) {
                tracing::warn!("Failed to push preview to '{}': {}", connection.user_id(), e);
            }
        }
        tracing::info!(
            "Message {} in '{}' delivered to {}/{} connections",
            message.message.id,
            chat_id,
            delivered_to,
            connections.len()
        );

        Ok(SendOutcome {
            message,
            delivered_to,
        })
    }
}
