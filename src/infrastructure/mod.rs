// src/infrastructure/mod.rs
pub mod blob;
pub mod config;
pub mod graphql;
pub mod renderer;
pub mod session;

pub use blob::HttpBlobStore;
pub use config::Config;
pub use graphql::GraphQlNoteService;
pub use session::Session;

use crate::domain::DomainError;
use config::HttpConfig;
use std::time::Duration;

/// HTTP client shared by the backend adapters
pub fn build_http_client(config: &HttpConfig) -> Result<reqwest::Client, DomainError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()
        .map_err(|e| DomainError::Config(format!("Failed to build HTTP client: {e}")))
}
