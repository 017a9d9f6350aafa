use std::time::Duration;

use learnhub_model::ModelError;
use thiserror::Error;

use crate::domain::users::auth::crypto::AuthCryptoError;

/// Failures at the store boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A single-row read matched nothing.
    #[error("no rows returned")]
    NoRows,

    #[error("store error {code}: {message}")]
    Backend { code: String, message: String },

    #[error("NetworkError: {0}")]
    Network(String),

    #[error("failed to decode store payload: {0}")]
    Decode(String),
}

impl StoreError {
    pub const NO_ROWS_CODE: &'static str = "PGRST116";
    pub const NETWORK_CODE: &'static str = "NetworkError";

    pub fn backend(code: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Backend {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Store error code consulted by message normalization.
    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::NoRows => Some(Self::NO_ROWS_CODE),
            StoreError::Backend { code, .. } => Some(code.as_str()),
            StoreError::Network(_) => Some(Self::NETWORK_CODE),
            StoreError::Decode(_) => None,
        }
    }

    /// Raw message as reported by the backend.
    pub fn message(&self) -> String {
        match self {
            StoreError::Backend { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Service-level error taxonomy.
#[derive(Error, Debug)]
pub enum LearnError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Update in progress")]
    Contention { key: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Too many attempts. Try again in {} seconds", retry_after.as_secs().max(1))]
    RateLimited { retry_after: Duration },

    #[error("Crypto error: {0}")]
    Crypto(#[from] AuthCryptoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LearnError {
    pub fn validation(message: impl Into<String>) -> Self {
        LearnError::Validation(message.into())
    }
}

impl From<ModelError> for LearnError {
    fn from(err: ModelError) -> Self {
        LearnError::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LearnError>;
