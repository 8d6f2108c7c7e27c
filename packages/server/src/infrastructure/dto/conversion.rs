//! Conversion logic between DTOs and domain types.

use chat_relay_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ChatId, ChatPreview, EnrichedMessage, Intent, MessageContent, OutboundEvent, OutgoingMessage,
    PresenceSnapshot, SendKind, UserProfile, ValueObjectError,
};
use crate::infrastructure::dto::{http as http_dto, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<dto::ClientFrame> for Intent {
    type Error = ValueObjectError;

    fn try_from(frame: dto::ClientFrame) -> Result<Self, Self::Error> {
        Ok(match frame {
            dto::ClientFrame::Leave => Intent::GoIdle,
            dto::ClientFrame::JoinChatRoom(payload) => {
                Intent::JoinChatRoom(ChatId::new(payload.chat_id)?)
            }
            dto::ClientFrame::LeaveChatRoom(payload) => {
                Intent::LeaveChatRoom(ChatId::new(payload.chat_id)?)
            }
            dto::ClientFrame::SendMessage(payload) => Intent::SendMessage(payload.try_into()?),
        })
    }
}

impl TryFrom<dto::SendMessagePayload> for OutgoingMessage {
    type Error = ValueObjectError;

    fn try_from(payload: dto::SendMessagePayload) -> Result<Self, Self::Error> {
        // グループ名があればグループ送信、画像は任意
        let kind = match payload.name {
            Some(name) if !name.trim().is_empty() => SendKind::Group {
                name,
                picture_url: payload.group_picture_url,
            },
            _ => SendKind::Direct,
        };

        Ok(Self {
            chat_id: ChatId::new(payload.chat_id)?,
            content: MessageContent::new(payload.content)?,
            attachments: payload.attachments.unwrap_or_default(),
            kind,
        })
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<UserProfile> for dto::UserDataPayload {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id.into_string(),
            username: profile.username,
            display_name: profile.display_name,
            avatar_url: profile.avatar_url,
        }
    }
}

impl From<EnrichedMessage> for dto::MessagePayload {
    fn from(enriched: EnrichedMessage) -> Self {
        let message = enriched.message;
        Self {
            id: message.id.to_string(),
            chat_id: message.chat_id.into_string(),
            sender_id: message.sender_id.into_string(),
            content: message.content.into_string(),
            attachments: message.attachments,
            read: message.read,
            timestamp: message.created_at.value(),
            created_at: timestamp_to_rfc3339(message.created_at.value()),
            sender: enriched.sender.into(),
        }
    }
}

impl TryFrom<OutboundEvent> for dto::ServerFrame {
    type Error = serde_json::Error;

    fn try_from(event: OutboundEvent) -> Result<Self, Self::Error> {
        let r#type = event.name().to_string();
        let data = match event {
            OutboundEvent::Error { message } => {
                Some(serde_json::to_value(dto::ErrorPayload { message })?)
            }
            OutboundEvent::Joined { user_id, chat_id } | OutboundEvent::Left { user_id, chat_id } => {
                Some(serde_json::to_value(dto::RoomPresencePayload {
                    user_id: user_id.into_string(),
                    chat_id: chat_id.into_string(),
                })?)
            }
            OutboundEvent::Message(enriched) => {
                Some(serde_json::to_value(dto::MessagePayload::from(*enriched))?)
            }
            OutboundEvent::ChatPreview(ChatPreview::Direct {
                chat_id,
                sender,
                last_message,
                last_message_on,
            }) => Some(serde_json::to_value(dto::ChatPreviewPayload {
                chat_id: chat_id.into_string(),
                user_data: sender.into(),
                last_message,
                last_message_on: timestamp_to_rfc3339(last_message_on.value()),
            })?),
            OutboundEvent::ChatPreview(ChatPreview::Group {
                chat_id,
                name,
                picture_url,
                last_message,
                last_message_on,
            }) => Some(serde_json::to_value(dto::GroupChatPreviewPayload {
                chat_id: chat_id.into_string(),
                last_message,
                last_message_on: timestamp_to_rfc3339(last_message_on.value()),
                name,
                group_picture_url: picture_url,
            })?),
            OutboundEvent::Signal(signal) => signal.into_payload(),
        };

        Ok(Self { r#type, data })
    }
}

impl From<PresenceSnapshot> for http_dto::PresenceSnapshotDto {
    fn from(snapshot: PresenceSnapshot) -> Self {
        Self {
            online_users: snapshot
                .online_users
                .into_iter()
                .map(|user_id| user_id.into_string())
                .collect(),
            rooms: snapshot
                .rooms
                .into_iter()
                .map(|(chat_id, occupants)| http_dto::RoomOccupancyDto {
                    chat_id: chat_id.into_string(),
                    occupants: occupants
                        .into_iter()
                        .map(|user_id| user_id.into_string())
                        .collect(),
                })
                .collect(),
        }
    }
}
