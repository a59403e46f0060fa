use thiserror::Error;

/// timegrid error types
#[derive(Error, Debug)]
pub enum TimegridError {
    /// Server unreachable or non-2xx response
    #[error("network error: {0}")]
    Network(String),

    /// Malformed response payload
    #[error("decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for timegrid
pub type Result<T> = std::result::Result<T, TimegridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TimegridError::Network("connection refused".into());
        assert_eq!(err.to_string(), "network error: connection refused");
    }

    #[test]
    fn test_decode_error_display() {
        let err = TimegridError::Decode("invalid json".into());
        assert_eq!(err.to_string(), "decode error: invalid json");
    }
}
