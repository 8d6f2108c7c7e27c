//! Real-time chat presence and delivery relay.
//!
//! Tracks which users are connected and which chat room each connection is
//! viewing, relays persisted messages to every connected chat member, and
//! pushes targeted signals to individual users.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
