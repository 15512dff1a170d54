//! Error types for CI note operations

use std::num::ParseIntError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CiNotesError {
    /// The note is not a JSON object of the report shape.
    #[error("deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("invalid report timestamp {timestamp:?}: {source}")]
    InvalidTimestamp {
        timestamp: String,
        #[source]
        source: ParseIntError,
    },
}

/// Result type for CI note operations
pub type Result<T> = std::result::Result<T, CiNotesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialization_error_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CiNotesError::from(json_err);
        assert!(err.to_string().contains("deserialization error"));
    }

    #[test]
    fn test_invalid_timestamp_display() {
        let source = "abc".parse::<i64>().unwrap_err();
        let err = CiNotesError::InvalidTimestamp {
            timestamp: "abc".to_string(),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("invalid report timestamp"));
        assert!(msg.contains("\"abc\""));
    }
}
