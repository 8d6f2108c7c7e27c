//! ドメイン層
//!
//! 値オブジェクト、エンティティ、接続の状態機械、
//! そしてユースケースが依存する trait（コラボレーター / レジストリ）を定義します。

pub mod auth;
pub mod connection;
pub mod entity;
pub mod error;
pub mod event;
pub mod intent;
pub mod repository;
pub mod session_registry;
pub mod value_object;

pub use auth::TokenVerifier;
pub use connection::{ConnectionHandle, ConnectionState, EventChannel};
pub use entity::{
    Chat, ChatPreview, EnrichedMessage, Message, NewMessage, OutgoingMessage,
    PresenceSnapshot, SendKind, UserProfile,
};
pub use error::{AuthError, MessagePushError, RepositoryError, ValueObjectError};
pub use event::{OutboundEvent, TargetedSignal};
pub use intent::Intent;
pub use repository::{MembershipOracle, MessageStore, RoomPresenceTracker};
pub use session_registry::SessionRegistry;
pub use value_object::{ChatId, ConnectionId, MessageContent, MessageId, Timestamp, UserId};

#[cfg(test)]
pub use auth::MockTokenVerifier;
#[cfg(test)]
pub use repository::{MockMembershipOracle, MockMessageStore};
