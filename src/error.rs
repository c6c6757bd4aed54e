//! Error types and handling for the exchange planner

use thiserror::Error;

/// Main error type for the planner service
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Request validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A requested record does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Missing or rejected credentials
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// External transport provider errors
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// Storage backend errors that are not database driver failures
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// SQLite driver errors
    #[error("Database error: {source}")]
    Database {
        #[from]
        source: rusqlite::Error,
    },

    /// JSON encoding of stored columns
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Message safe to hand back to an API client.
    ///
    /// Validation and not-found messages are written for the client already;
    /// everything else collapses to a generic text so backend details stay in
    /// the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Validation { message } | PlannerError::NotFound { message } => {
                message.clone()
            }
            PlannerError::Unauthorized { .. } => "unauthorized".to_string(),
            PlannerError::Config { .. } => "service misconfigured".to_string(),
            PlannerError::Provider { .. } => "transport provider unavailable".to_string(),
            PlannerError::Storage { .. }
            | PlannerError::Database { .. }
            | PlannerError::Serialization { .. }
            | PlannerError::Io { .. } => "internal error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = PlannerError::config("missing secret");
        assert!(matches!(config_err, PlannerError::Config { .. }));

        let not_found = PlannerError::not_found("trip not found");
        assert!(matches!(not_found, PlannerError::NotFound { .. }));

        let validation_err = PlannerError::validation("missing city");
        assert!(matches!(validation_err, PlannerError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            PlannerError::validation("missing to").user_message(),
            "missing to"
        );
        assert_eq!(
            PlannerError::unauthorized("bad signature").user_message(),
            "unauthorized"
        );
        assert_eq!(
            PlannerError::storage("lock poisoned").user_message(),
            "internal error"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PlannerError = io_err.into();
        assert!(matches!(err, PlannerError::Io { .. }));
    }
}
