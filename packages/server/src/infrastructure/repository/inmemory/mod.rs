//! インメモリ実装
//!
//! - `room_presence`: RoomPresenceTracker（リレーが所有する一時状態）
//! - `chat_store`: MembershipOracle + MessageStore（外部ストアの代替）

pub mod chat_store;
pub mod room_presence;

pub use chat_store::InMemoryChatStore;
pub use room_presence::InMemoryRoomPresenceTracker;
