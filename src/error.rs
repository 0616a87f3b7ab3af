//! Error handling for registry operations.
//!
//! Provides error types with context for store mutation, configuration
//! loading, database enumeration, and stable-identifier lookup failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    /// A required argument was missing or empty
    #[error("bad input: {message}")]
    BadInput { message: String },

    /// A configuration document had the wrong structure
    #[error("configuration type mismatch: {message}")]
    TypeMismatch { message: String },

    /// No species alias resolved for a lookup
    #[error("not found: {message}")]
    NotFound { message: String },

    /// A (species, group) adaptor slot was already occupied
    #[error("adaptor already registered for species '{species}', group '{group}'")]
    AlreadyExists { species: String, group: String },

    /// A registry URL did not match the accepted grammar
    #[error("bad registry URL '{url}': {reason}")]
    BadUrl { url: String, reason: String },

    /// No adaptor factory is registered for a group's module
    #[error("adaptor module '{module}' is not available")]
    UnavailableModule { module: String },

    /// Failure reported by the database layer
    #[error("database backend error: {message}")]
    Backend { message: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RegistryError {
    /// Create a bad input error
    pub fn bad_input(message: impl Into<String>) -> Self {
        Self::BadInput {
            message: message.into(),
        }
    }

    /// Create a configuration type mismatch error
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an already exists error for a (species, group) slot
    pub fn already_exists(species: impl Into<String>, group: impl Into<String>) -> Self {
        Self::AlreadyExists {
            species: species.into(),
            group: group.into(),
        }
    }

    /// Create a bad URL error
    pub fn bad_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BadUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create an unavailable module error
    pub fn unavailable_module(module: impl Into<String>) -> Self {
        Self::UnavailableModule {
            module: module.into(),
        }
    }

    /// Create a backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
