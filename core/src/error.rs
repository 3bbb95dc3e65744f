//! Error types for template generation

use thiserror::Error;

/// Main error type for `LinkML` template operations
#[derive(Error, Debug)]
pub enum LinkMLError {
    /// Schema parsing errors
    #[error("Failed to parse schema: {message}")]
    ParseError {
        /// Error message
        message: String,
        /// Source (file or URL) if available
        location: Option<String>,
    },

    /// Import resolution errors
    #[error("Failed to resolve import '{import}': {reason}")]
    ImportError {
        /// Import that failed
        import: String,
        /// Reason for failure
        reason: String,
    },

    /// A schema element that an operation requires is missing
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// Element kind (class, slot, ...)
        kind: &'static str,
        /// Element name
        name: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Service integration errors
    #[error("Service error: {0}")]
    ServiceError(String),

    /// Generic errors with context
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for `LinkML` operations
pub type Result<T> = std::result::Result<T, LinkMLError>;

impl LinkMLError {
    /// Create a new parse error
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: None,
        }
    }

    /// Create a new parse error with location
    #[must_use]
    pub fn parse_at(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: Some(location.into()),
        }
    }

    /// Create a new import error
    #[must_use]
    pub fn import(import: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImportError {
            import: import.into(),
            reason: reason.into(),
        }
    }

    /// Create a not-found error for a schema element
    #[must_use]
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a new service error
    #[must_use]
    pub fn service(message: impl Into<String>) -> Self {
        Self::ServiceError(message.into())
    }

    /// Create an IO error from a message
    #[must_use]
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::IoError(std::io::Error::other(message.into()))
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError(message.into())
    }

    /// Create a generic error with source
    #[must_use]
    pub fn other_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<serde_json::Error> for LinkMLError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for LinkMLError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<url::ParseError> for LinkMLError {
    fn from(err: url::ParseError) -> Self {
        Self::parse(format!("invalid URL: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LinkMLError::parse("Invalid YAML");
        assert!(matches!(err, LinkMLError::ParseError { .. }));

        let err = LinkMLError::parse_at("Invalid syntax", "meta.yaml");
        match err {
            LinkMLError::ParseError { location, .. } => {
                assert_eq!(location.as_deref(), Some("meta.yaml"));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = LinkMLError::import("linkml:units", "File not found");
        let display = err.to_string();
        assert!(display.contains("linkml:units"));
        assert!(display.contains("File not found"));

        let err = LinkMLError::not_found("class", "slot_definition");
        assert_eq!(err.to_string(), "class 'slot_definition' not found");
    }

    #[test]
    fn test_error_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let linkml_err: LinkMLError = json_err.into();
        assert!(matches!(linkml_err, LinkMLError::SerializationError(_)));

        let url_err = url::Url::parse("not a url").unwrap_err();
        let linkml_err: LinkMLError = url_err.into();
        assert!(matches!(linkml_err, LinkMLError::ParseError { .. }));
    }
}
