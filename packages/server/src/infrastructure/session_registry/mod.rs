//! Session Registry の実装
//!
//! - `inmemory`: HashMap を使ったプロセス内実装（プロセス再起動で空に戻る）

pub mod inmemory;

pub use inmemory::InMemorySessionRegistry;
