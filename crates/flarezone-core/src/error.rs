//! Error types for flarezone
//!
//! Every failure surfaced by the object model or a service implementation
//! is one of these variants. Nothing in this crate retries or swallows
//! errors; service failures reach the caller unchanged.

use thiserror::Error;

/// Result type alias for flarezone operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for flarezone
#[derive(Error, Debug)]
pub enum Error {
    /// Read or write of a field/setting the entity does not have
    #[error("{entity} has no attribute '{name}'")]
    AttributeNotFound {
        /// Entity kind ("zone", "record", "zone settings")
        entity: &'static str,
        /// Requested field or setting id
        name: String,
    },

    /// Write to a zone setting whose descriptor is not editable
    #[error("Setting '{0}' is not editable")]
    NotEditable(String),

    /// Lookup returned no match
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote service rejected the request (validation, auth, conflict)
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Service name ("cloudflare", "cloudflare-host")
        provider: String,
        /// Error message
        message: String,
    },

    /// Transport-level failure talking to the service
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create an "attribute not found" error
    pub fn attribute_not_found(entity: &'static str, name: impl Into<String>) -> Self {
        Self::AttributeNotFound {
            entity,
            name: name.into(),
        }
    }

    /// Create a "not editable" error
    pub fn not_editable(id: impl Into<String>) -> Self {
        Self::NotEditable(id.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
