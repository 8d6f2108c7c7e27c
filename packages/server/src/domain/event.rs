//! 接続へ送信されるイベント（ワイヤ形式に依存しないドメイン表現）

use super::{
    entity::{ChatPreview, EnrichedMessage},
    error::ValueObjectError,
    value_object::{ChatId, UserId},
};

/// 任意のイベント名とペイロードを持つターゲットシグナル
///
/// リレー自身が送るイベント名（`message` など）は使えない。
#[derive(Debug, Clone, PartialEq)]
pub struct TargetedSignal {
    event: String,
    payload: Option<serde_json::Value>,
}

impl TargetedSignal {
    pub const REFETCH_CHATS: &'static str = "refetch-chats";

    /// リレーのイベントと見分けがつかなくなるため、シグナルに使えないイベント名
    pub const RESERVED_EVENTS: [&'static str; 6] =
        ["error", "joined", "left", "message", "chat", "group-chat"];

    /// # Errors
    ///
    /// イベント名が空白のみ、または予約済みの場合は `ValueObjectError` を返す。
    pub fn new(
        event: impl Into<String>,
        payload: Option<serde_json::Value>,
    ) -> Result<Self, ValueObjectError> {
        let event = event.into();
        if event.trim().is_empty() {
            return Err(ValueObjectError::Empty("event"));
        }
        if Self::is_reserved(&event) {
            return Err(ValueObjectError::Reserved {
                field: "event",
                value: event,
            });
        }
        Ok(Self { event, payload })
    }

    pub fn is_reserved(event: &str) -> bool {
        Self::RESERVED_EVENTS.contains(&event)
    }

    /// チャット一覧の再取得を促すシグナル
    pub fn refetch_chats() -> Self {
        Self {
            event: Self::REFETCH_CHATS.to_string(),
            payload: None,
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<serde_json::Value> {
        self.payload
    }
}

/// リレーから接続へ送るイベント
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    Error { message: String },
    Joined { user_id: UserId, chat_id: ChatId },
    Left { user_id: UserId, chat_id: ChatId },
    Message(Box<EnrichedMessage>),
    ChatPreview(ChatPreview),
    Signal(TargetedSignal),
}

impl OutboundEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// ワイヤ上のイベント名
    pub fn name(&self) -> &str {
        match self {
            Self::Error { .. } => "error",
            Self::Joined { .. } => "joined",
            Self::Left { .. } => "left",
            Self::Message(_) => "message",
            Self::ChatPreview(ChatPreview::Direct { .. }) => "chat",
            Self::ChatPreview(ChatPreview::Group { .. }) => "group-chat",
            Self::Signal(signal) => signal.event(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;
    use serde_json::json;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn chat(id: &str) -> ChatId {
        ChatId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_signal_accepts_custom_event() {
        // テスト項目: 予約されていないイベント名のシグナルは作成できる
        // given (前提条件):
        let payload = Some(json!({"from": "bob"}));

        // when (操作):
        let signal = TargetedSignal::new("new-friend", payload.clone()).unwrap();

        // then (期待する結果):
        assert_eq!(signal.event(), "new-friend");
        assert_eq!(signal.payload(), payload.as_ref());
    }

    #[test]
    fn test_signal_refuses_relay_event_names() {
        // テスト項目: リレー自身のイベント名・空白のイベント名ではシグナルを作れない
        // given (前提条件):
        let payload = Some(json!({"senderId": "alice", "content": "wire me $500"}));

        for name in TargetedSignal::RESERVED_EVENTS {
            // when (操作):
            let result = TargetedSignal::new(name, payload.clone());

            // then (期待する結果):
            assert_eq!(
                result,
                Err(ValueObjectError::Reserved {
                    field: "event",
                    value: name.to_string(),
                })
            );
        }
        assert_eq!(
            TargetedSignal::new("  ", None),
            Err(ValueObjectError::Empty("event"))
        );
    }

    #[test]
    fn test_every_relay_event_name_is_reserved() {
        // テスト項目: シグナル以外のイベントのワイヤ名はすべて予約済みである
        // given (前提条件):
        let events = [
            OutboundEvent::error("boom"),
            OutboundEvent::Joined {
                user_id: user("alice"),
                chat_id: chat("c1"),
            },
            OutboundEvent::Left {
                user_id: user("alice"),
                chat_id: chat("c1"),
            },
            OutboundEvent::ChatPreview(ChatPreview::Direct {
                chat_id: chat("c1"),
                sender: crate::domain::UserProfile::placeholder(user("alice")),
                last_message: "hi".to_string(),
                last_message_on: Timestamp::new(0),
            }),
        ];

        // when (操作) / then (期待する結果):
        for event in &events {
            assert!(TargetedSignal::is_reserved(event.name()), "{}", event.name());
        }
        assert!(TargetedSignal::is_reserved("message"));
        assert!(TargetedSignal::is_reserved("group-chat"));
        assert!(!TargetedSignal::is_reserved(TargetedSignal::REFETCH_CHATS));
    }
}
