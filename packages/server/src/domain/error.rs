//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のバリデーションエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} is too long (max {max} characters, got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field} '{value}' is reserved")]
    Reserved { field: &'static str, value: String },
}

/// 外部コラボレーター（Membership Oracle / Message Store）のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("chat '{0}' not found")]
    ChatNotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// 接続へのイベント送信エラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("connection for '{0}' is closed")]
    ConnectionClosed(String),
}

/// 接続時のトークン検証エラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing credential")]
    MissingToken,

    #[error("invalid credential: {0}")]
    InvalidToken(String),
}
