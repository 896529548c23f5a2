//! Error types for glyphscan.

use thiserror::Error;

/// Main error type for glyphscan operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Multi-row template rejected at library load
    #[error("Invalid template '{name}': {reason}")]
    InvalidTemplate {
        /// Template name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Single-line rule rejected at library load
    #[error("Invalid pattern '{name}': {reason}")]
    InvalidPattern {
        /// Rule name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Replacement formatter could not handle a match
    #[error("Formatter error: {0}")]
    Formatter(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input or parameters (generic)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_template_error() {
        let err = Error::InvalidTemplate {
            name: "arrow_down#2".to_string(),
            reason: "rows have unequal width".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid template 'arrow_down#2': rows have unequal width"
        );
    }

    #[test]
    fn test_invalid_pattern_error() {
        let err = Error::InvalidPattern {
            name: "progress".to_string(),
            reason: "empty pattern".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid pattern 'progress': empty pattern");
    }

    #[test]
    fn test_formatter_error() {
        let err = Error::Formatter("no glyphs to count".to_string());
        assert_eq!(err.to_string(), "Formatter error: no glyphs to count");
    }

    #[test]
    fn test_config_error() {
        let err = Error::Config("scan.threshold must be in (0, 1]".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: scan.threshold must be in (0, 1]"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
