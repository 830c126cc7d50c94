//! Configuration module for environment variable parsing.
//!
//! Numeric settings fall back to their defaults with a warning. The webhook
//! URL does not: a bad value stops startup instead of sending payloads
//! somewhere unintended.

use std::{env, time::Duration};

use tracing::warn;
use url::Url;

use crate::error::RelayError;

/// Endpoint used when `WEBHOOK_URL` is unset.
pub const DEFAULT_WEBHOOK_URL: &str = "https://api.thingspeak.com/update.json";

/// Throttle interval used when `THROTTLE_MS` is unset.
pub const DEFAULT_THROTTLE_MS: u64 = 15_000;

/// Listening port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Webhook endpoint every payload is forwarded to
    pub webhook_url: Url,

    /// Minimum spacing between the start of consecutive forwards
    pub throttle_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, RelayError> {
        let webhook_url = match env::var("WEBHOOK_URL") {
            Ok(raw) => parse_webhook_url(&raw)?,
            Err(_) => parse_webhook_url(DEFAULT_WEBHOOK_URL)?,
        };

        Ok(Config {
            port: parse_var("PORT", DEFAULT_PORT),
            webhook_url,
            throttle_ms: parse_var("THROTTLE_MS", DEFAULT_THROTTLE_MS),
        })
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

/// Parse an absolute http(s) URL.
pub fn parse_webhook_url(raw: &str) -> Result<Url, RelayError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| RelayError::Config(format!("WEBHOOK_URL {raw:?} is not a valid URL: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RelayError::Config(format!(
            "WEBHOOK_URL must use http or https, got {other:?}"
        ))),
    }
}

/// Parse a variable with `FromStr`, warning and falling back on bad input.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_valid() {
        env::set_var("TEST_RELAY_THROTTLE", " 2500 ");
        assert_eq!(parse_var("TEST_RELAY_THROTTLE", 0u64), 2500);
        env::remove_var("TEST_RELAY_THROTTLE");
    }

    #[test]
    fn test_parse_var_invalid_uses_default() {
        env::set_var("TEST_RELAY_PORT", "not-a-port");
        assert_eq!(parse_var("TEST_RELAY_PORT", 8080u16), 8080);
        env::remove_var("TEST_RELAY_PORT");
    }

    #[test]
    fn test_parse_var_default() {
        assert_eq!(parse_var("NONEXISTENT_RELAY_VAR", 42u64), 42);
    }

    #[test]
    fn test_default_webhook_url_parses() {
        let url = parse_webhook_url(DEFAULT_WEBHOOK_URL).unwrap();
        assert_eq!(url.host_str(), Some("api.thingspeak.com"));
        assert_eq!(url.path(), "/update.json");
    }

    #[test]
    fn test_webhook_url_rejects_garbage() {
        let err = parse_webhook_url("not a url").unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }

    #[test]
    fn test_webhook_url_rejects_non_http_scheme() {
        let err = parse_webhook_url("ftp://example.com/hook").unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_throttle_duration() {
        let config = Config {
            port: DEFAULT_PORT,
            webhook_url: parse_webhook_url("http://localhost:9000/hook").unwrap(),
            throttle_ms: 1500,
        };
        assert_eq!(config.throttle(), Duration::from_millis(1500));
    }
}
