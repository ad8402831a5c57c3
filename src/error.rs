//! Relay error types.
//!
//! [`RelayError`] is the central error type for the relay. None of its
//! variants is fatal once the server is running: persistence failures are
//! logged and swallowed, encoding failures drop the affected frame. Only
//! bootstrap (configuration, binding the listener) lets an error escape.

/// Server-side error enum.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// An environment variable was present but could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Filesystem failure while reading or writing the stats document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An inbound frame parsed as JSON but was not an object.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// JSON encoding or decoding failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RelayError {
    /// Returns a short, stable label for this variant, used as a
    /// structured logging field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::MalformedMessage(_) => "malformed_message",
            Self::Serialization(_) => "serialization",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let err: RelayError = std::io::Error::other("disk gone").into();
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn json_error_converts() {
        let Err(json_err) = serde_json::from_str::<serde_json::Value>("{") else {
            panic!("expected parse failure");
        };
        let err = RelayError::from(json_err);
        assert_eq!(err.kind(), "serialization");
    }

    #[test]
    fn config_message_is_displayed() {
        let err = RelayError::Config("PORT must be a number".to_string());
        assert_eq!(err.to_string(), "invalid configuration: PORT must be a number");
    }
}
