// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Not signed in: no session token configured")]
    NotAuthenticated,
    #[error("Note service error: {0}")]
    Service(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Blob not found: {0}")]
    BlobNotFound(String),
    #[error("Blob store error: {0}")]
    Blob(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
