//! Relay configuration loaded from environment variables

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::types::UnsupportedPayloadPolicy;

pub const DEFAULT_PORT: u16 = 6969;
pub const DEFAULT_NAME: &str = "dorkiBallz";
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the HTTP/WebSocket listener binds to
    pub bind_addr: SocketAddr,
    /// Directory served for everything that is not `/ws` or `/api`
    pub static_dir: PathBuf,
    /// Display name a participant has until it sends `/u`
    pub default_name: String,
    /// Behaviour after a binary frame
    pub unsupported_payload: UnsupportedPayloadPolicy,
    /// Frames that may queue for one participant before deliveries fail
    pub outbound_buffer: usize,
    /// Strip control characters from names and chat lines
    pub sanitize_input: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            static_dir: PathBuf::from("public"),
            default_name: DEFAULT_NAME.to_string(),
            unsupported_payload: UnsupportedPayloadPolicy::Notify,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            sanitize_input: false,
        }
    }
}

impl RelayConfig {
    /// Load config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = match std::env::var("RELAY_BIND") {
            Ok(v) => v.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %v, "Invalid RELAY_BIND, using default");
                defaults.bind_addr
            }),
            Err(_) => defaults.bind_addr,
        };

        let static_dir = std::env::var("RELAY_STATIC_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let default_name = std::env::var("RELAY_DEFAULT_NAME")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.default_name);

        let unsupported_payload = if env_flag("RELAY_CLOSE_ON_BINARY", false) {
            UnsupportedPayloadPolicy::Disconnect
        } else {
            UnsupportedPayloadPolicy::Notify
        };

        let outbound_buffer = match std::env::var("RELAY_OUTBOUND_BUFFER") {
            Ok(v) => match v.trim().parse::<usize>() {
                Ok(n) => n.max(1),
                Err(_) => {
                    tracing::warn!(value = %v, "Invalid RELAY_OUTBOUND_BUFFER, using default");
                    defaults.outbound_buffer
                }
            },
            Err(_) => defaults.outbound_buffer,
        };

        let sanitize_input = env_flag("RELAY_SANITIZE_INPUT", false);

        let config = Self {
            bind_addr,
            static_dir,
            default_name,
            unsupported_payload,
            outbound_buffer,
            sanitize_input,
        };

        tracing::info!(
            bind_addr = %config.bind_addr,
            static_dir = %config.static_dir.display(),
            default_name = %config.default_name,
            unsupported_payload = ?config.unsupported_payload,
            outbound_buffer = config.outbound_buffer,
            sanitize_input = config.sanitize_input,
            "Relay config loaded"
        );

        config
    }

    /// Apply input cleaning if enabled
    pub fn clean<'a>(&self, input: &'a str) -> std::borrow::Cow<'a, str> {
        if self.sanitize_input {
            std::borrow::Cow::Owned(crate::protocol::clean_input(input))
        } else {
            std::borrow::Cow::Borrowed(input)
        }
    }
}

/// Boolean env var: anything but "0"/"false" counts as set
fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v != "0" && v.to_lowercase() != "false")
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "RELAY_BIND",
        "RELAY_STATIC_DIR",
        "RELAY_DEFAULT_NAME",
        "RELAY_CLOSE_ON_BINARY",
        "RELAY_OUTBOUND_BUFFER",
        "RELAY_SANITIZE_INPUT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    fn set_env(key: &str, value: &str) {
        std::env::set_var(key, value);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = RelayConfig::from_env();

        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.default_name, DEFAULT_NAME);
        assert_eq!(config.unsupported_payload, UnsupportedPayloadPolicy::Notify);
        assert_eq!(config.outbound_buffer, DEFAULT_OUTBOUND_BUFFER);
        assert!(!config.sanitize_input);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        set_env("RELAY_BIND", "127.0.0.1:7000");
        set_env("RELAY_STATIC_DIR", "/srv/chat");
        set_env("RELAY_DEFAULT_NAME", "guest");
        set_env("RELAY_CLOSE_ON_BINARY", "true");
        set_env("RELAY_OUTBOUND_BUFFER", "8");
        set_env("RELAY_SANITIZE_INPUT", "1");

        let config = RelayConfig::from_env();
        clear_env();

        assert_eq!(config.bind_addr, "127.0.0.1:7000".parse().unwrap());
        assert_eq!(config.static_dir, PathBuf::from("/srv/chat"));
        assert_eq!(config.default_name, "guest");
        assert_eq!(
            config.unsupported_payload,
            UnsupportedPayloadPolicy::Disconnect
        );
        assert_eq!(config.outbound_buffer, 8);
        assert!(config.sanitize_input);
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_values_fall_back() {
        clear_env();
        set_env("RELAY_BIND", "not-an-address");
        set_env("RELAY_OUTBOUND_BUFFER", "lots");
        set_env("RELAY_CLOSE_ON_BINARY", "false");
        set_env("RELAY_DEFAULT_NAME", "   ");

        let config = RelayConfig::from_env();
        clear_env();

        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(config.outbound_buffer, DEFAULT_OUTBOUND_BUFFER);
        assert_eq!(config.unsupported_payload, UnsupportedPayloadPolicy::Notify);
        assert_eq!(config.default_name, DEFAULT_NAME);
    }

    #[test]
    #[serial]
    fn test_outbound_buffer_clamped() {
        clear_env();
        set_env("RELAY_OUTBOUND_BUFFER", "0");
        let config = RelayConfig::from_env();
        clear_env();

        assert_eq!(config.outbound_buffer, 1);
    }

    #[test]
    fn test_clean_respects_flag() {
        let mut config = RelayConfig::default();
        assert_eq!(config.clean("a\u{1b}b"), "a\u{1b}b");
        config.sanitize_input = true;
        assert_eq!(config.clean("a\u{1b}b"), "ab");
    }
}
