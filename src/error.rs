//! Error types and handling for the `Hribi` application

use thiserror::Error;

/// Main error type for the `Hribi` application
#[derive(Error, Debug)]
pub enum HribiError {
    /// Identity lookup found nothing; reserved for "give me this one
    /// specific entity" calls. Zero query matches is not an error.
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// External API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl HribiError {
    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            HribiError::NotFound { what } => format!("No results for {what}."),
            HribiError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            HribiError::Api { .. } => {
                "Unable to reach external services. Please check your internet connection."
                    .to_string()
            }
            HribiError::Validation { message } => format!("Invalid input: {message}"),
            HribiError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            HribiError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
