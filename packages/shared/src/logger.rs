//! Logging setup utilities for the chat relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the relay library crates and the calling binary log at `default_log_level`
/// unless `RUST_LOG` is set, in which case the environment wins.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "chat-relay-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use chat_relay_shared::logger::setup_logger;
///
/// setup_logger("chat-relay-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directive used when `RUST_LOG` is not set.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "chat_relay_server={level},chat_relay_shared={level},{bin}={level},tower_http={level}",
        level = default_log_level,
        bin = binary_name.replace('-', "_"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_binary_and_crates() {
        // テスト項目: デフォルトのフィルタにライブラリとバイナリの両方が含まれる
        // given (前提条件):
        let binary_name = "chat-relay-server";

        // when (操作):
        let filter = default_filter(binary_name, "debug");

        // then (期待する結果):
        assert!(filter.contains("chat_relay_server=debug"));
        assert!(filter.contains("chat_relay_shared=debug"));
        assert!(filter.contains("tower_http=debug"));
        assert!(!filter.contains('-'));
    }
}
