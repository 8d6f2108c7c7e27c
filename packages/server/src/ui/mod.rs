//! UI 層: Axum のルーター、WebSocket / HTTP ハンドラー、接続ごとのインテント処理

mod handler;
mod server;
mod session;
mod signal;
pub mod state;

pub use server::Server;
