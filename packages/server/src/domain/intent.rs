//! 接続から届く操作（インテント）
//!
//! ワイヤ形式から変換された後、接続ごとのキューに積まれて順番に処理される。

use super::{entity::OutgoingMessage, value_object::ChatId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// `leave`: セッションの登録だけを解除する（タブを閉じる直前など）
    GoIdle,
    JoinChatRoom(ChatId),
    LeaveChatRoom(ChatId),
    SendMessage(OutgoingMessage),
}
