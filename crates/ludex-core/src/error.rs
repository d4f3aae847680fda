use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("API client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Failures surfaced by the search index backend.
///
/// `AlreadyExists` is not a correctness hazard: recreating an existing
/// index is a no-op at the backend, so callers treat it as success.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("index already exists")]
    AlreadyExists,

    #[error("index backend unavailable: {0}")]
    Unavailable(String),

    #[error("document write failed: {0}")]
    Write(String),
}
