//! Error types for the directory proxy

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Rejected request parameters. The message is returned to the caller verbatim.
    #[error("{message}")]
    InvalidInput { message: String },

    #[error("No matching {entity_type} was found.")]
    NotFound { entity_type: String },

    #[error("Malformed request body: {message}")]
    MalformedRequest { message: String },

    #[error("Secret resolution error: {message}")]
    SecretError { message: String },

    #[error("Authentication error: {message}")]
    AuthError { message: String },

    #[error("Graph API error: {code} - {message}")]
    GraphApi { code: String, message: String },

    #[error("Malformed directory record '{id}': {message}")]
    MalformedRecord { id: String, message: String },

    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// How an error is reported at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad tenant id or search parameters.
    Validation,
    /// Zero or ambiguous matches.
    NotFound,
    /// Everything raised past validation: secrets, transport, Graph, bad records.
    Upstream,
}

impl DirectoryError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn not_found(entity_type: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
        }
    }

    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    pub fn secret_error(message: impl Into<String>) -> Self {
        Self::SecretError {
            message: message.into(),
        }
    }

    pub fn auth_error(message: impl Into<String>) -> Self {
        Self::AuthError {
            message: message.into(),
        }
    }

    pub fn http_error(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidInput { .. } => ErrorClass::Validation,
            Self::NotFound { .. } => ErrorClass::NotFound,
            _ => ErrorClass::Upstream,
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
