//! エンティティ
//!
//! リレーが参照する永続化済みデータ（Chat / Message / UserProfile）と、
//! 送信フローで生成される派生データを定義します。
//! リレー自身はこれらを所有せず、外部コラボレーター経由で読み書きします。

use std::collections::{BTreeMap, BTreeSet};

use super::value_object::{ChatId, MessageContent, MessageId, Timestamp, UserId};

/// ユーザープロフィール（送信者情報のスナップショットとして配信に同梱される）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: UserId,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// プロフィールが見つからないユーザー向けの最小限のスナップショット
    pub fn placeholder(user_id: UserId) -> Self {
        Self {
            username: user_id.as_str().to_string(),
            display_name: user_id.as_str().to_string(),
            user_id,
            avatar_url: None,
        }
    }
}

/// チャット（メンバーシップの正となるデータ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub members: Vec<UserId>,
    pub is_group: bool,
    pub name: Option<String>,
    pub creator: Option<UserId>,
    pub picture_url: Option<String>,
}

impl Chat {
    pub fn has_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|member| member == user_id)
    }
}

/// 永続化前のメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub content: MessageContent,
    pub attachments: Vec<String>,
    pub read: bool,
    pub created_at: Timestamp,
}

/// 永続化済みのメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub content: MessageContent,
    pub attachments: Vec<String>,
    pub read: bool,
    pub created_at: Timestamp,
}

impl Message {
    pub fn from_new(id: MessageId, new_message: NewMessage) -> Self {
        Self {
            id,
            chat_id: new_message.chat_id,
            sender_id: new_message.sender_id,
            content: new_message.content,
            attachments: new_message.attachments,
            read: new_message.read,
            created_at: new_message.created_at,
        }
    }
}

/// 送信者プロフィールを付与したメッセージ（配信用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedMessage {
    pub message: Message,
    pub sender: UserProfile,
}

/// send-message の種別
///
/// グループ用のメタデータはフィールドの有無で推測せず、バリアントで区別する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendKind {
    Direct,
    Group {
        name: String,
        picture_url: Option<String>,
    },
}

/// 接続から送信されたメッセージ（永続化前、既読状態の決定前）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub chat_id: ChatId,
    pub content: MessageContent,
    pub attachments: Vec<String>,
    pub kind: SendKind,
}

impl OutgoingMessage {
    /// 本文が空で添付もないメッセージは送れない
    pub fn is_empty(&self) -> bool {
        self.content.is_blank() && self.attachments.is_empty()
    }
}

/// チャット一覧のプレビュー更新
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatPreview {
    Direct {
        chat_id: ChatId,
        sender: UserProfile,
        last_message: String,
        last_message_on: Timestamp,
    },
    Group {
        chat_id: ChatId,
        name: String,
        picture_url: Option<String>,
        last_message: String,
        last_message_on: Timestamp,
    },
}

impl ChatPreview {
    /// 配信したメッセージと送信種別からプレビューを組み立てる
    pub fn for_message(enriched: &EnrichedMessage, kind: &SendKind) -> Self {
        let message = &enriched.message;
        match kind {
            SendKind::Direct => Self::Direct {
                chat_id: message.chat_id.clone(),
                sender: enriched.sender.clone(),
                last_message: message.content.as_str().to_string(),
                last_message_on: message.created_at,
            },
            SendKind::Group { name, picture_url } => Self::Group {
                chat_id: message.chat_id.clone(),
                name: name.clone(),
                picture_url: picture_url.clone(),
                last_message: message.content.as_str().to_string(),
                last_message_on: message.created_at,
            },
        }
    }
}

/// 在室状態のスナップショット（デバッグ用）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresenceSnapshot {
    pub online_users: Vec<UserId>,
    pub rooms: BTreeMap<ChatId, BTreeSet<UserId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> EnrichedMessage {
        let alice = UserId::new("alice".to_string()).unwrap();
        EnrichedMessage {
            message: Message {
                id: MessageId::generate(),
                chat_id: ChatId::new("chat-1".to_string()).unwrap(),
                sender_id: alice.clone(),
                content: MessageContent::new("hi".to_string()).unwrap(),
                attachments: vec![],
                read: false,
                created_at: Timestamp::new(1000),
            },
            sender: UserProfile::placeholder(alice),
        }
    }

    #[test]
    fn test_chat_has_member() {
        // テスト項目: メンバーリストに含まれるユーザーのみメンバーと判定される
        // given (前提条件):
        let alice = UserId::new("alice".to_string()).unwrap();
        let bob = UserId::new("bob".to_string()).unwrap();
        let chat = Chat {
            id: ChatId::new("chat-1".to_string()).unwrap(),
            members: vec![alice.clone()],
            is_group: false,
            name: None,
            creator: None,
            picture_url: None,
        };

        // when (操作) / then (期待する結果):
        assert!(chat.has_member(&alice));
        assert!(!chat.has_member(&bob));
    }

    #[test]
    fn test_preview_for_direct_send_carries_sender() {
        // テスト項目: ダイレクト送信のプレビューには送信者プロフィールが含まれる
        // given (前提条件):
        let enriched = sample_message();

        // when (操作):
        let preview = ChatPreview::for_message(&enriched, &SendKind::Direct);

        // then (期待する結果):
        match preview {
            ChatPreview::Direct {
                sender,
                last_message,
                last_message_on,
                ..
            } => {
                assert_eq!(sender.user_id.as_str(), "alice");
                assert_eq!(last_message, "hi");
                assert_eq!(last_message_on, Timestamp::new(1000));
            }
            other => panic!("unexpected preview: {other:?}"),
        }
    }

    #[test]
    fn test_preview_for_group_send_carries_group_metadata() {
        // テスト項目: グループ送信のプレビューにはグループ名と画像が含まれる
        // given (前提条件):
        let enriched = sample_message();
        let kind = SendKind::Group {
            name: "team".to_string(),
            picture_url: Some("https://example.com/team.png".to_string()),
        };

        // when (操作):
        let preview = ChatPreview::for_message(&enriched, &kind);

        // then (期待する結果):
        assert_eq!(
            preview,
            ChatPreview::Group {
                chat_id: ChatId::new("chat-1".to_string()).unwrap(),
                name: "team".to_string(),
                picture_url: Some("https://example.com/team.png".to_string()),
                last_message: "hi".to_string(),
                last_message_on: Timestamp::new(1000),
            }
        );
    }
}
