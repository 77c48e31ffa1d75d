use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("invalid short link: {0}")]
    InvalidLink(String),
}

/// Errors returned by [`Repository`][crate::Repository] implementations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Duplicate(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors returned by a [`Shortener`][crate::Shortener].
///
/// This is the closed set of outcomes the gateway has to translate.
/// Collisions are retried inside the service and never show up here.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid expiration: {0}")]
    InvalidExpiration(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("short link not found: {0}")]
    NotFound(String),
    #[error("short link expired: {0}")]
    Expired(String),
    #[error("no unique short code found after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
            CoreError::InvalidLink(message) => Self::InvalidExpiration(message),
        }
    }
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(code) => Self::NotFound(code),
            other => Self::Storage(other.to_string()),
        }
    }
}
