//! Error types for the Amigo application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Amigo application.
///
/// Every variant is recoverable. Callers decide whether to surface the
/// condition to the user or to fall back to a documented default.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmigoError {
    /// The durable medium rejected a read or write (quota, disabled storage).
    #[error("Persistence unavailable for '{key}': {message}")]
    PersistenceUnavailable { key: String, message: String },

    /// A stored value did not parse against its expected shape.
    #[error("Malformed stored data for '{key}': {message}")]
    MalformedStoredData { key: String, message: String },

    /// No dictionary contained the requested translation key.
    #[error("Translation missing: {0}")]
    TranslationMissing(String),

    /// Transport error, timeout or schema validation failure from the generation client.
    #[error("Generation request failed: {0}")]
    GenerationRequestFailed(String),

    /// An operation was attempted from a state that does not allow it.
    #[error("Cannot {operation} while in state {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    /// User supplied input that failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AmigoError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a PersistenceUnavailable error
    pub fn persistence_unavailable(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PersistenceUnavailable {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a MalformedStoredData error
    pub fn malformed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedStoredData {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a GenerationRequestFailed error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationRequestFailed(message.into())
    }

    /// Creates an InvalidState error
    pub fn invalid_state(operation: &'static str, state: impl std::fmt::Display) -> Self {
        Self::InvalidState {
            operation,
            state: state.to_string(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a PersistenceUnavailable error
    pub fn is_persistence_unavailable(&self) -> bool {
        matches!(self, Self::PersistenceUnavailable { .. })
    }

    /// Check if this is a MalformedStoredData error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedStoredData { .. })
    }

    /// Check if this is a GenerationRequestFailed error
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, Self::GenerationRequestFailed(_))
    }

    /// Check if this is an InvalidState error
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Check if this is an InvalidInput error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AmigoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AmigoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AmigoError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for AmigoError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at the application boundary)
impl From<anyhow::Error> for AmigoError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, AmigoError>`.
pub type Result<T> = std::result::Result<T, AmigoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(AmigoError::persistence_unavailable("language", "quota").is_persistence_unavailable());
        assert!(AmigoError::malformed("moodHistory", "eof").is_malformed());
        assert!(AmigoError::generation("timeout").is_generation_failure());
        assert!(AmigoError::invalid_state("submit", "Idle").is_invalid_state());
        assert!(!AmigoError::internal("x").is_not_found());
    }

    #[test]
    fn test_display_includes_key() {
        let err = AmigoError::malformed("activeTasks", "expected map");
        assert_eq!(
            err.to_string(),
            "Malformed stored data for 'activeTasks': expected map"
        );
    }

    #[test]
    fn test_from_serde_json() {
        let err: AmigoError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, AmigoError::Serialization { ref format, .. } if format == "JSON"));
    }
}
