//! Error types shared by the relay core and the HTTP front door.

use thiserror::Error;

/// Errors produced while relaying a payload to the webhook endpoint.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The outbound call failed before a status line was received.
    ///
    /// Carries the underlying error's description verbatim so it can be
    /// handed back to the original caller.
    #[error("{0}")]
    Transport(String),

    /// The drainer task is no longer running.
    #[error("relay is not accepting payloads")]
    Closed,

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// Startup configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RelayError {
    /// Build a transport error from anything displayable.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_is_raw_description() {
        let err = RelayError::transport("connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_config_display_has_context() {
        let err = RelayError::Config("WEBHOOK_URL must use http or https".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: WEBHOOK_URL must use http or https"
        );
    }
}
