//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object `{"type": <event>, "data": <payload>}`.
//! Payload field names are camelCase; `data` is omitted for events without payload.

use serde::{Deserialize, Serialize};

/// Frames sent by a client (inbound intents)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ClientFrame {
    Leave,
    JoinChatRoom(RoomPayload),
    LeaveChatRoom(RoomPayload),
    SendMessage(SendMessagePayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    pub chat_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    #[serde(default)]
    pub content: String,
    pub chat_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

/// Frame sent by the relay (outbound event)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerFrame {
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// `joined` / `left`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPresencePayload {
    pub user_id: String,
    pub chat_id: String,
}

/// Sender profile snapshot (`userData`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataPayload {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// `message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub content: String,
    pub attachments: Vec<String>,
    pub read: bool,
    /// Unix milliseconds
    pub timestamp: i64,
    /// RFC 3339
    pub created_at: String,
    pub sender: UserDataPayload,
}

/// `chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPreviewPayload {
    pub chat_id: String,
    pub user_data: UserDataPayload,
    pub last_message: String,
    pub last_message_on: String,
}

/// `group-chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupChatPreviewPayload {
    pub chat_id: String,
    pub last_message: String,
    pub last_message_on: String,
    pub name: String,
    pub group_picture_url: Option<String>,
}
