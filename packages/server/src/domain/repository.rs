//! Repository trait 定義
//!
//! ユースケース層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! - `MembershipOracle` / `MessageStore`: 永続化データへの窓口（外部コラボレーター）
//! - `RoomPresenceTracker`: プロセス内だけで保持する一時的な在室状態

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;

use super::{
    entity::{EnrichedMessage, NewMessage},
    error::RepositoryError,
    value_object::{ChatId, ConnectionId, UserId},
};

/// チャットのメンバーシップを答える外部コラボレーター
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipOracle: Send + Sync {
    /// ユーザーがチャットのメンバーかどうか
    ///
    /// チャットが存在しない場合は `RepositoryError::ChatNotFound` を返す。
    async fn is_member(&self, chat_id: &ChatId, user_id: &UserId)
    -> Result<bool, RepositoryError>;

    /// チャットの全メンバー
    async fn members_of(&self, chat_id: &ChatId) -> Result<Vec<UserId>, RepositoryError>;
}

/// メッセージを永続化する外部コラボレーター
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// メッセージを保存し、送信者プロフィールを付与して返す
    async fn create_message(&self, message: NewMessage)
    -> Result<EnrichedMessage, RepositoryError>;

    /// `excluding` 以外が送信したチャット内の全メッセージを既読にする
    ///
    /// 既読に変わった件数を返す。
    async fn mark_all_read(
        &self,
        chat_id: &ChatId,
        excluding: &UserId,
    ) -> Result<usize, RepositoryError>;
}

/// ルームの在室状態（chat id → そのチャット画面を開いているユーザー）
///
/// 在室は接続単位で記録し、問い合わせはユーザー単位で答える。
/// 同じユーザーの接続が 1 つでも残っていれば、そのユーザーは在室のまま。
/// 各操作は単一のマップ操作として不可分に行われる。
/// メンバーシップの検証は呼び出し側の責務。
#[async_trait]
pub trait RoomPresenceTracker: Send + Sync {
    /// 接続を在室させる。ユーザーが新たに在室者になった場合は true
    async fn join(&self, chat_id: &ChatId, user_id: &UserId, connection_id: ConnectionId) -> bool;

    /// 接続を退室させる。ユーザーの最後の接続が抜けた場合だけ true。
    /// 集合が空になればエントリごと削除する。
    async fn leave(&self, chat_id: &ChatId, user_id: &UserId, connection_id: ConnectionId)
    -> bool;

    /// 在室者（未知の chat id なら空集合）
    async fn occupants(&self, chat_id: &ChatId) -> BTreeSet<UserId>;

    /// 在室者数
    async fn occupant_count(&self, chat_id: &ChatId) -> usize;

    /// ユーザーが在室しているか
    async fn contains(&self, chat_id: &ChatId, user_id: &UserId) -> bool;

    /// 全ルームの在室状態（デバッグ用）
    async fn snapshot(&self) -> BTreeMap<ChatId, BTreeSet<UserId>>;
}
