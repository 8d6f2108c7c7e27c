//! Session Registry trait 定義
//!
//! ユーザー ID → ライブ接続ハンドルの対応を管理する。
//! 1 ユーザーにつき同時に高々 1 接続（後から接続した方が勝つ）。

use async_trait::async_trait;

use super::{
    connection::ConnectionHandle,
    event::OutboundEvent,
    value_object::{ConnectionId, UserId},
};

#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// 接続を登録する。既存のエントリは無条件に置き換える
    async fn register(&self, connection: ConnectionHandle);

    /// ユーザーのエントリを削除する（存在しなければ何もしない）
    async fn unregister(&self, user_id: &UserId);

    /// エントリが `connection_id` の接続を指している場合のみ削除する
    ///
    /// 置き換え済みの古い接続が遅れて切断しても、新しい接続の登録を消さないために使う。
    async fn unregister_connection(&self, user_id: &UserId, connection_id: ConnectionId) -> bool;

    /// ユーザーの接続を引く
    async fn resolve(&self, user_id: &UserId) -> Option<ConnectionHandle>;

    /// 接続中のユーザーの接続だけを返す（オフラインのユーザーは黙ってスキップ）
    async fn resolve_many(&self, user_ids: &[UserId]) -> Vec<ConnectionHandle>;

    /// 接続中のユーザー全員に同じイベントを送る
    ///
    /// 一部の送信失敗は許容し、届けられた接続の数を返す。
    async fn broadcast(&self, user_ids: &[UserId], event: OutboundEvent) -> usize;

    /// 接続中のユーザー一覧（デバッグ用）
    async fn online_users(&self) -> Vec<UserId>;
}
