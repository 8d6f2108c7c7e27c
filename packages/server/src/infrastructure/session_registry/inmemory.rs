//! インメモリ Session Registry 実装
//!
//! ## 責務
//!
//! - ユーザー ID → `ConnectionHandle` の管理（1 ユーザー 1 接続、後勝ち）
//! - ファンアウト時の接続解決（`resolve` / `resolve_many`）
//!
//! ## 設計ノート
//!
//! 接続（WebSocket）の生成と破棄は UI 層（`ui/handler/websocket.rs`）が行います。
//! このレジストリは生成済みの接続ハンドルを参照として保持するだけです。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionHandle, ConnectionId, OutboundEvent, SessionRegistry, UserId};

/// インメモリ Session Registry
#[derive(Default)]
pub struct InMemorySessionRegistry {
    /// Key: user_id, Value: その時点で有効な唯一の接続
    sessions: Mutex<HashMap<UserId, ConnectionHandle>>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn register(&self, connection: ConnectionHandle) {
        let user_id = connection.user_id().clone();
        let connection_id = connection.id();
        let previous = self
            .sessions
            .lock()
            .await
            .insert(user_id.clone(), connection);

        match previous {
            Some(previous) => tracing::debug!(
                "Session for '{}' replaced ({} -> {})",
                user_id,
                previous.id(),
                connection_id
            ),
            None => tracing::debug!("Session for '{}' registered ({})", user_id, connection_id),
        }
    }

    async fn unregister(&self, user_id: &UserId) {
        if self.sessions.lock().await.remove(user_id).is_some() {
            tracing::debug!("Session for '{}' unregistered", user_id);
        }
    }

    async fn unregister_connection(&self, user_id: &UserId, connection_id: ConnectionId) -> bool {
        let mut sessions = self.sessions.lock().await;
        let is_current = sessions
            .get(user_id)
            .is_some_and(|connection| connection.id() == connection_id);
        if is_current {
            sessions.remove(user_id);
            tracing::debug!("Session for '{}' unregistered ({})", user_id, connection_id);
        } else {
            tracing::debug!(
                "Session for '{}' not unregistered: {} is not the current connection",
                user_id,
                connection_id
            );
        }
        is_current
    }

    async fn resolve(&self, user_id: &UserId) -> Option<ConnectionHandle> {
        self.sessions.lock().await.get(user_id).cloned()
    }

    async fn resolve_many(&self, user_ids: &[UserId]) -> Vec<ConnectionHandle> {
        let sessions = self.sessions.lock().await;
        user_ids
            .iter()
            .filter_map(|user_id| sessions.get(user_id).cloned())
            .collect()
    }

    async fn broadcast(&self, user_ids: &[UserId], event: OutboundEvent) -> usize {
        let connections = self.resolve_many(user_ids).await;
        let mut delivered = 0;
        for connection in connections {
            // ブロードキャストでは一部の送信失敗を許容
            match connection.emit(event.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    "Failed to push '{}' to '{}': {}",
                    event.name(),
                    connection.user_id(),
                    e
                ),
            }
        }
        delivered
    }

    async fn online_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.sessions.lock().await.keys().cloned().collect();
        users.sort();
        users
    }
}
