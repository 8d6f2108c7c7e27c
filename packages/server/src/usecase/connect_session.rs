//! UseCase: セッション接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::authenticate() / execute() メソッド
//! - トークン検証とセッション登録（後勝ち）
//!
//! ### どのような状況を想定しているか
//! - 正常系：有効なトークンでの接続
//! - 異常系：トークンなし・不正なトークン
//! - エッジケース：同じユーザーの再接続（古い接続が置き換えられる）

use std::sync::Arc;

use crate::domain::{
    AuthError, ConnectionHandle, ConnectionState, EventChannel, SessionRegistry, TokenVerifier,
    UserId,
};

use super::error::ConnectError;

/// セッション接続のユースケース
pub struct ConnectSessionUseCase {
    /// TokenVerifier（資格情報検証の抽象化）
    token_verifier: Arc<dyn TokenVerifier>,
    /// SessionRegistry（ライブ接続の管理）
    session_registry: Arc<dyn SessionRegistry>,
}

impl ConnectSessionUseCase {
    pub fn new(
        token_verifier: Arc<dyn TokenVerifier>,
        session_registry: Arc<dyn SessionRegistry>,
    ) -> Self {
        Self {
            token_verifier,
            session_registry,
        }
    }

    /// 接続時に提示されたトークンを検証する
    ///
    /// WebSocket へのアップグレード前に呼び、失敗した接続はどのコンポーネントにも入れない。
    pub fn authenticate(&self, token: Option<&str>) -> Result<UserId, ConnectError> {
        let token = token.ok_or(AuthError::MissingToken)?;
        Ok(self.token_verifier.verify(token)?)
    }

    /// 認証済みの接続をセッションとして登録する
    ///
    /// # Returns
    ///
    /// 接続ごとの状態（NotInRoom で開始）
    pub async fn execute(&self, user_id: UserId, sender: EventChannel) -> ConnectionState {
        let handle = ConnectionHandle::new(user_id, sender);
        self.session_registry.register(handle.clone()).await;
        tracing::info!(
            "Session for '{}' connected ({})",
            handle.user_id(),
            handle.id()
        );
        ConnectionState::new(handle)
    }
}
