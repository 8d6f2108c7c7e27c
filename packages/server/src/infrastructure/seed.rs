//! シードファイルの読み込み
//!
//! インメモリ チャットストアの初期データ（ユーザーとチャット）を JSON から読み込みます。
//!
//! ```json
//! {
//!   "users": [{"id": "alice", "username": "alice", "displayName": "Alice"}],
//!   "chats": [{"id": "c1", "members": ["alice", "bob"]}]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Chat, ChatId, UserId, UserProfile, ValueObjectError};

use super::repository::InMemoryChatStore;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid seed data: {0}")]
    Invalid(#[from] ValueObjectError),
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub chats: Vec<SeedChat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedUser {
    pub id: String,
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedChat {
    pub id: String,
    pub members: Vec<String>,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
}

impl TryFrom<SeedUser> for UserProfile {
    type Error = ValueObjectError;

    fn try_from(user: SeedUser) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(user.id)?,
            username: user.username,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
        })
    }
}

impl TryFrom<SeedChat> for Chat {
    type Error = ValueObjectError;

    fn try_from(chat: SeedChat) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ChatId::new(chat.id)?,
            members: chat
                .members
                .into_iter()
                .map(UserId::new)
                .collect::<Result<Vec<_>, _>>()?,
            is_group: chat.is_group,
            name: chat.name,
            creator: chat.creator.map(UserId::new).transpose()?,
            picture_url: chat.picture_url,
        })
    }
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// シードデータを登録したチャットストアを作成する
    pub fn into_store(self) -> Result<InMemoryChatStore, SeedError> {
        let profiles = self
            .users
            .into_iter()
            .map(UserProfile::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let chats = self
            .chats
            .into_iter()
            .map(Chat::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InMemoryChatStore::with_data(profiles, chats))
    }
}
