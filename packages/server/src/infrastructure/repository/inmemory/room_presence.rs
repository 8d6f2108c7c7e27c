//! InMemory RoomPresenceTracker 実装
//!
//! chat id → ユーザー → 在室中の接続集合 を HashMap で保持します。
//! 接続集合が空になったユーザー、在室者がいなくなったルームは即座に削除し、
//! 空集合を残しません。

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatId, ConnectionId, RoomPresenceTracker, UserId};

type Occupants = HashMap<UserId, HashSet<ConnectionId>>;

/// インメモリ RoomPresenceTracker 実装
#[derive(Default)]
pub struct InMemoryRoomPresenceTracker {
    rooms: Mutex<HashMap<ChatId, Occupants>>,
}

impl InMemoryRoomPresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomPresenceTracker for InMemoryRoomPresenceTracker {
    async fn join(&self, chat_id: &ChatId, user_id: &UserId, connection_id: ConnectionId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let connections = rooms
            .entry(chat_id.clone())
            .or_default()
            .entry(user_id.clone())
            .or_default();
        let newly_present = connections.is_empty();
        connections.insert(connection_id);
        newly_present
    }

    async fn leave(
        &self,
        chat_id: &ChatId,
        user_id: &UserId,
        connection_id: ConnectionId,
    ) -> bool {
        let mut rooms = self.rooms.lock().await;
        let Some(occupants) = rooms.get_mut(chat_id) else {
            return false;
        };
        let Some(connections) = occupants.get_mut(user_id) else {
            return false;
        };
        if !connections.remove(&connection_id) {
            return false;
        }
        if !connections.is_empty() {
            tracing::debug!(
                "'{}' still has {} connection(s) in room '{}'",
                user_id,
                connections.len(),
                chat_id
            );
            return false;
        }
        occupants.remove(user_id);
        if occupants.is_empty() {
            rooms.remove(chat_id);
            tracing::debug!("Room '{}' is empty and was removed", chat_id);
        }
        true
    }

    async fn occupants(&self, chat_id: &ChatId) -> BTreeSet<UserId> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(chat_id)
            .map(|occupants| occupants.keys().cloned().collect())
            .unwrap_or_default()
    }

    async fn occupant_count(&self, chat_id: &ChatId) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.get(chat_id).map_or(0, HashMap::len)
    }

    async fn contains(&self, chat_id: &ChatId, user_id: &UserId) -> bool {
        let rooms = self.rooms.lock().await;
        rooms
            .get(chat_id)
            .is_some_and(|occupants| occupants.contains_key(user_id))
    }

    async fn snapshot(&self) -> BTreeMap<ChatId, BTreeSet<UserId>> {
        let rooms = self.rooms.lock().await;
        rooms
            .iter()
            .map(|(chat_id, occupants)| (chat_id.clone(), occupants.keys().cloned().collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - join / leave による在室集合の更新
    // - 最後の在室者が退室したときにエントリが削除されること
    // - 未知のルームに対する問い合わせが空を返すこと（冪等な退室を含む）
    // - 同じユーザーの複数接続: 最後の接続が抜けるまで在室のまま
    // ========================================

    fn chat(id: &str) -> ChatId {
        ChatId::new(id.to_string()).unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_creates_room_lazily() {
        // テスト項目: 最初の join でルームが作られ、在室者として数えられる
        // given (前提条件):
        let tracker = InMemoryRoomPresenceTracker::new();

        // when (操作):
        let added = tracker
            .join(&chat("c1"), &user("alice"), ConnectionId::generate())
            .await;

        // then (期待する結果):
        assert!(added);
        assert_eq!(tracker.occupant_count(&chat("c1")).await, 1);
        assert!(tracker.contains(&chat("c1"), &user("alice")).await);
    }

    #[tokio::test]
    async fn test_join_twice_does_not_duplicate() {
        // テスト項目: 同じ接続の 2 回目の join は集合を増やさない
        // given (前提条件):
        let tracker = InMemoryRoomPresenceTracker::new();
        let connection = ConnectionId::generate();
        tracker.join(&chat("c1"), &user("alice"), connection).await;

        // when (操作):
        let added = tracker.join(&chat("c1"), &user("alice"), connection).await;

        // then (期待する結果):
        assert!(!added);
        assert_eq!(tracker.occupant_count(&chat("c1")).await, 1);
    }

    #[tokio::test]
    async fn test_last_leave_removes_room_entry() {
        // テスト項目: 最後の在室者が退室するとルームのエントリが削除される
        // given (前提条件):
        let tracker = InMemoryRoomPresenceTracker::new();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        tracker.join(&chat("c1"), &user("alice"), alice).await;
        tracker.join(&chat("c1"), &user("bob"), bob).await;

        // when (操作):
        tracker.leave(&chat("c1"), &user("alice"), alice).await;
        let after_first = tracker.snapshot().await;
        tracker.leave(&chat("c1"), &user("bob"), bob).await;

        // then (期待する結果):
        assert_eq!(
            after_first.get(&chat("c1")),
            Some(&BTreeSet::from([user("bob")]))
        );
        assert!(tracker.snapshot().await.is_empty());
        assert_eq!(tracker.occupant_count(&chat("c1")).await, 0);
    }

    #[tokio::test]
    async fn test_leave_unknown_room_is_noop() {
        // テスト項目: 入室していないルームからの退室はエラーにならず状態も変わらない
        // given (前提条件):
        let tracker = InMemoryRoomPresenceTracker::new();
        let alice = ConnectionId::generate();
        tracker.join(&chat("c1"), &user("alice"), alice).await;

        // when (操作):
        let removed_unknown_room = tracker.leave(&chat("c2"), &user("alice"), alice).await;
        let removed_other_user = tracker
            .leave(&chat("c1"), &user("bob"), ConnectionId::generate())
            .await;

        // then (期待する結果):
        assert!(!removed_unknown_room);
        assert!(!removed_other_user);
        assert_eq!(
            tracker.occupants(&chat("c1")).await,
            BTreeSet::from([user("alice")])
        );
        assert!(tracker.occupants(&chat("c2")).await.is_empty());
    }

    #[tokio::test]
    async fn test_user_stays_until_last_connection_leaves() {
        // テスト項目: 同じユーザーの 2 接続が在室しているとき、片方の退室ではユーザーは残る
        // given (前提条件):
        let tracker = InMemoryRoomPresenceTracker::new();
        let first_tab = ConnectionId::generate();
        let second_tab = ConnectionId::generate();
        let first_added = tracker.join(&chat("c1"), &user("alice"), first_tab).await;
        let second_added = tracker.join(&chat("c1"), &user("alice"), second_tab).await;

        // when (操作):
        let first_gone = tracker.leave(&chat("c1"), &user("alice"), first_tab).await;

        // then (期待する結果):
        assert!(first_added);
        assert!(!second_added);
        assert!(!first_gone);
        assert!(tracker.contains(&chat("c1"), &user("alice")).await);
        assert_eq!(tracker.occupant_count(&chat("c1")).await, 1);

        let second_gone = tracker.leave(&chat("c1"), &user("alice"), second_tab).await;
        assert!(second_gone);
        assert!(tracker.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_leave_with_unknown_connection_keeps_user() {
        // テスト項目: 記録されていない接続 id での退室はユーザーを外さない
        // given (前提条件):
        let tracker = InMemoryRoomPresenceTracker::new();
        tracker
            .join(&chat("c1"), &user("alice"), ConnectionId::generate())
            .await;

        // when (操作):
        let removed = tracker
            .leave(&chat("c1"), &user("alice"), ConnectionId::generate())
            .await;

        // then (期待する結果):
        assert!(!removed);
        assert!(tracker.contains(&chat("c1"), &user("alice")).await);
    }
}
