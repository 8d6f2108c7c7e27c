//! 接続時の資格情報を検証する trait

use super::{error::AuthError, value_object::UserId};

/// 接続時に提示されたトークンを検証し、ユーザー ID に変換する
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}
