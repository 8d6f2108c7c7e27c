mod http;
mod websocket;

pub use http::{debug_presence, health_check, post_signal};
pub use websocket::websocket_handler;
