//! InMemory チャットストア実装
//!
//! 永続化層（Chat / Message / UserProfile）のインメモリ代替です。
//! `MembershipOracle` と `MessageStore` の両方を実装し、
//! シードファイルから初期データを読み込めます。
//!
//! ## 技術的負債
//!
//! メッセージはプロセス内にしか残りません。永続化が必要な場合は
//! 同じ trait を実装したデータベース実装に差し替えてください。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Chat, ChatId, EnrichedMessage, MembershipOracle, Message, MessageId, MessageStore, NewMessage,
    RepositoryError, UserId, UserProfile,
};

#[derive(Default)]
struct ChatStoreData {
    chats: HashMap<ChatId, Chat>,
    profiles: HashMap<UserId, UserProfile>,
    messages: HashMap<ChatId, Vec<Message>>,
}

/// インメモリ チャットストア
#[derive(Default)]
pub struct InMemoryChatStore {
    data: Mutex<ChatStoreData>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// プロフィールとチャットを登録した状態で作成
    pub fn with_data(profiles: Vec<UserProfile>, chats: Vec<Chat>) -> Self {
        let data = ChatStoreData {
            chats: chats.into_iter().map(|chat| (chat.id.clone(), chat)).collect(),
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.user_id.clone(), profile))
                .collect(),
            messages: HashMap::new(),
        };
        Self {
            data: Mutex::new(data),
        }
    }

    /// チャットのメッセージ（保存順）
    pub async fn messages_of(&self, chat_id: &ChatId) -> Vec<Message> {
        self.data
            .lock()
            .await
            .messages
            .get(chat_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn chat_count(&self) -> usize {
        self.data.lock().await.chats.len()
    }
}

#[async_trait]
impl MembershipOracle for InMemoryChatStore {
    async fn is_member(&self, chat_id: &ChatId, user_id: &UserId) -> Result<bool, RepositoryError> {
        let data = self.data.lock().await;
        let chat = data
            .chats
            .get(chat_id)
            .ok_or_else(|| RepositoryError::ChatNotFound(chat_id.as_str().to_string()))?;
        Ok(chat.has_member(user_id))
    }

    async fn members_of(&self, chat_id: &ChatId) -> Result<Vec<UserId>, RepositoryError> {
        let data = self.data.lock().await;
        data.chats
            .get(chat_id)
            .map(|chat| chat.members.clone())
            .ok_or_else(|| RepositoryError::ChatNotFound(chat_id.as_str().to_string()))
    }
}

#[async_trait]
impl MessageStore for InMemoryChatStore {
    async fn create_message(
        &self,
        new_message: NewMessage,
    ) -> Result<EnrichedMessage, RepositoryError> {
        let mut data = self.data.lock().await;
        if !data.chats.contains_key(&new_message.chat_id) {
            return Err(RepositoryError::ChatNotFound(
                new_message.chat_id.as_str().to_string(),
            ));
        }

        let sender = data
            .profiles
            .get(&new_message.sender_id)
            .cloned()
            .unwrap_or_else(|| UserProfile::placeholder(new_message.sender_id.clone()));
        let message = Message::from_new(MessageId::generate(), new_message);
        data.messages
            .entry(message.chat_id.clone())
            .or_default()
            .push(message.clone());

        Ok(EnrichedMessage { message, sender })
    }

    async fn mark_all_read(
        &self,
        chat_id: &ChatId,
        excluding: &UserId,
    ) -> Result<usize, RepositoryError> {
        let mut data = self.data.lock().await;
        if !data.chats.contains_key(chat_id) {
            return Err(RepositoryError::ChatNotFound(chat_id.as_str().to_string()));
        }

        let mut updated = 0;
        if let Some(messages) = data.messages.get_mut(chat_id) {
            for message in messages
                .iter_mut()
                .filter(|message| &message.sender_id != excluding && !message.read)
            {
                message.read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageContent, Timestamp};

    fn chat_id(id: &str) -> ChatId {
        ChatId::new(id.to_string()).unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn create_test_store() -> InMemoryChatStore {
        let alice = UserProfile {
            user_id: user("alice"),
            username: "alice".to_string(),
            display_name: "Alice".to_string(),
            avatar_url: Some("https://example.com/alice.png".to_string()),
        };
        let chat = Chat {
            id: chat_id("c1"),
            members: vec![user("alice"), user("bob")],
            is_group: false,
            name: None,
            creator: None,
            picture_url: None,
        };
        InMemoryChatStore::with_data(vec![alice], vec![chat])
    }

    fn new_message(sender: &str, content: &str) -> NewMessage {
        NewMessage {
            chat_id: chat_id("c1"),
            sender_id: user(sender),
            content: MessageContent::new(content.to_string()).unwrap(),
            attachments: vec![],
            read: false,
            created_at: Timestamp::new(1000),
        }
    }

    #[tokio::test]
    async fn test_is_member_for_unknown_chat_is_not_found() {
        // テスト項目: 存在しないチャットのメンバー確認は ChatNotFound になる
        // given (前提条件):
        let store = create_test_store();

        // when (操作):
        let result = store.is_member(&chat_id("missing"), &user("alice")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::ChatNotFound("missing".to_string()))
        );
    }

    #[tokio::test]
    async fn test_is_member_and_members_of() {
        // テスト項目: メンバー判定とメンバー一覧がチャットの定義どおりに返る
        // given (前提条件):
        let store = create_test_store();

        // when (操作) / then (期待する結果):
        assert_eq!(store.is_member(&chat_id("c1"), &user("alice")).await, Ok(true));
        assert_eq!(store.is_member(&chat_id("c1"), &user("carol")).await, Ok(false));
        assert_eq!(
            store.members_of(&chat_id("c1")).await,
            Ok(vec![user("alice"), user("bob")])
        );
    }

    #[tokio::test]
    async fn test_create_message_attaches_sender_profile() {
        // テスト項目: 保存したメッセージに送信者プロフィールが付与される
        // given (前提条件):
        let store = create_test_store();

        // when (操作):
        let enriched = store
            .create_message(new_message("alice", "hello"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(enriched.sender.display_name, "Alice");
        assert_eq!(enriched.message.content.as_str(), "hello");
        assert_eq!(store.messages_of(&chat_id("c1")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_message_without_profile_uses_placeholder() {
        // テスト項目: プロフィール未登録の送信者にはプレースホルダーが使われる
        // given (前提条件):
        let store = create_test_store();

        // when (操作):
        let enriched = store.create_message(new_message("bob", "hey")).await.unwrap();

        // then (期待する結果):
        assert_eq!(enriched.sender, UserProfile::placeholder(user("bob")));
    }

    #[tokio::test]
    async fn test_mark_all_read_skips_own_messages() {
        // テスト項目: 自分が送ったメッセージ以外だけが既読になる
        // given (前提条件):
        let store = create_test_store();
        store.create_message(new_message("alice", "1")).await.unwrap();
        store.create_message(new_message("bob", "2")).await.unwrap();
        store.create_message(new_message("bob", "3")).await.unwrap();

        // when (操作):
        let updated = store
            .mark_all_read(&chat_id("c1"), &user("alice"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(updated, 2);
        let messages = store.messages_of(&chat_id("c1")).await;
        let read: Vec<bool> = messages.iter().map(|m| m.read).collect();
        assert_eq!(read, vec![false, true, true]);

        // 2 回目は更新対象なし
        assert_eq!(
            store.mark_all_read(&chat_id("c1"), &user("alice")).await,
            Ok(0)
        );
    }
}
