//! Repository の実装
//!
//! ドメイン層が定義する trait の具体的な実装を提供します。

pub mod inmemory;

pub use inmemory::{InMemoryChatStore, InMemoryRoomPresenceTracker};
