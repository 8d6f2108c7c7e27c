//! 接続ハンドルと接続ごとの状態機械
//!
//! 1 本の接続は同時に高々 1 つのルームにしか入らない。
//! `ConnectionState` は `NotInRoom` / `InRoom` の遷移だけを扱い、
//! Tracker や Session Registry への反映はユースケース側で行う。

use tokio::sync::mpsc;

use super::{
    error::MessagePushError,
    event::OutboundEvent,
    value_object::{ChatId, ConnectionId, UserId},
};

/// 接続へイベントを届けるチャンネル
pub type EventChannel = mpsc::UnboundedSender<OutboundEvent>;

/// 1 本のライブ接続への参照
///
/// clone してもチャンネルの送信側が複製されるだけで、接続そのものは UI 層が所有する。
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    user_id: UserId,
    sender: EventChannel,
}

impl ConnectionHandle {
    pub fn new(user_id: UserId, sender: EventChannel) -> Self {
        Self {
            id: ConnectionId::generate(),
            user_id,
            sender,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// イベントを送信する（接続が既に閉じていればエラー）
    pub fn emit(&self, event: OutboundEvent) -> Result<(), MessagePushError> {
        self.sender
            .send(event)
            .map_err(|_| MessagePushError::ConnectionClosed(self.user_id.as_str().to_string()))
    }
}

/// 接続が現在いるルーム
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum RoomState {
    #[default]
    NotInRoom,
    InRoom(ChatId),
}

/// 接続ごとの状態
#[derive(Debug, Clone)]
pub struct ConnectionState {
    handle: ConnectionHandle,
    room: RoomState,
}

impl ConnectionState {
    pub fn new(handle: ConnectionHandle) -> Self {
        Self {
            handle,
            room: RoomState::NotInRoom,
        }
    }

    pub fn handle(&self) -> &ConnectionHandle {
        &self.handle
    }

    pub fn user_id(&self) -> &UserId {
        self.handle.user_id()
    }

    pub fn current_room(&self) -> Option<&ChatId> {
        match &self.room {
            RoomState::InRoom(chat_id) => Some(chat_id),
            RoomState::NotInRoom => None,
        }
    }

    /// `chat_id` のルームに入る
    ///
    /// 別のルームにいた場合はそのルームの ID を返す（呼び出し側で退室処理を行う）。
    pub fn enter_room(&mut self, chat_id: ChatId) -> Option<ChatId> {
        match std::mem::replace(&mut self.room, RoomState::InRoom(chat_id.clone())) {
            RoomState::InRoom(previous) if previous != chat_id => Some(previous),
            _ => None,
        }
    }

    /// `chat_id` のルームから出る。現在のルームだった場合のみ true を返す。
    pub fn leave_room(&mut self, chat_id: &ChatId) -> bool {
        if self.current_room() == Some(chat_id) {
            self.room = RoomState::NotInRoom;
            true
        } else {
            false
        }
    }

    /// 現在のルームを取り出して `NotInRoom` に戻す（切断時に使用）
    pub fn take_room(&mut self) -> Option<ChatId> {
        match std::mem::take(&mut self.room) {
            RoomState::InRoom(chat_id) => Some(chat_id),
            RoomState::NotInRoom => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(id: &str) -> ChatId {
        ChatId::new(id.to_string()).unwrap()
    }

    fn create_state() -> (ConnectionState, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::new(UserId::new("alice".to_string()).unwrap(), tx);
        (ConnectionState::new(handle), rx)
    }

    #[test]
    fn test_new_state_is_not_in_room() {
        // テスト項目: 接続直後はどのルームにもいない
        // given (前提条件) / when (操作):
        let (state, _rx) = create_state();

        // then (期待する結果):
        assert_eq!(state.current_room(), None);
    }

    #[test]
    fn test_enter_room_from_another_room_returns_previous() {
        // テスト項目: 別のルームに入ると直前のルームが返される
        // given (前提条件):
        let (mut state, _rx) = create_state();
        assert_eq!(state.enter_room(chat("c1")), None);

        // when (操作):
        let previous = state.enter_room(chat("c2"));

        // then (期待する結果):
        assert_eq!(previous, Some(chat("c1")));
        assert_eq!(state.current_room(), Some(&chat("c2")));
    }

    #[test]
    fn test_enter_same_room_twice_returns_none() {
        // テスト項目: 同じルームへの再入室では直前のルームは返されない
        // given (前提条件):
        let (mut state, _rx) = create_state();
        state.enter_room(chat("c1"));

        // when (操作):
        let previous = state.enter_room(chat("c1"));

        // then (期待する結果):
        assert_eq!(previous, None);
        assert_eq!(state.current_room(), Some(&chat("c1")));
    }

    #[test]
    fn test_leave_other_room_keeps_current() {
        // テスト項目: 現在のルーム以外を指定した退室では状態が変わらない
        // given (前提条件):
        let (mut state, _rx) = create_state();
        state.enter_room(chat("c1"));

        // when (操作):
        let left = state.leave_room(&chat("c2"));

        // then (期待する結果):
        assert!(!left);
        assert_eq!(state.current_room(), Some(&chat("c1")));
    }

    #[test]
    fn test_take_room_resets_state() {
        // テスト項目: take_room で現在のルームが取り出され NotInRoom に戻る
        // given (前提条件):
        let (mut state, _rx) = create_state();
        state.enter_room(chat("c1"));

        // when (操作):
        let taken = state.take_room();

        // then (期待する結果):
        assert_eq!(taken, Some(chat("c1")));
        assert_eq!(state.current_room(), None);
        assert_eq!(state.take_room(), None);
    }

    #[tokio::test]
    async fn test_emit_after_receiver_dropped_fails() {
        // テスト項目: 受信側が閉じた接続への送信はエラーになる
        // given (前提条件):
        let (state, rx) = create_state();
        drop(rx);

        // when (操作):
        let result = state.handle().emit(OutboundEvent::error("boom"));

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ConnectionClosed("alice".to_string()))
        );
    }
}
