//! UseCase 層のエラー型
//!
//! `Display` の文言はそのまま `error` イベントとしてクライアントに送られる。

use thiserror::Error;

use crate::domain::{AuthError, ChatId, RepositoryError};

/// 接続時のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] AuthError),
}

/// join-chat-room のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JoinRoomError {
    #[error("you are not a member of chat '{0}'")]
    NotMember(ChatId),

    #[error("chat '{0}' not found")]
    ChatNotFound(ChatId),

    #[error("could not verify membership: {0}")]
    MembershipUnavailable(RepositoryError),
}

/// send-message のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendMessageError {
    #[error("message must have content or attachments")]
    EmptyMessage,

    #[error("you must join chat '{0}' before sending messages")]
    NotInRoom(ChatId),

    #[error("failed to send message: {0}")]
    PersistFailed(RepositoryError),

    #[error("message saved but could not be delivered: {0}")]
    DeliveryFailed(RepositoryError),
}
