// src/infrastructure/blob.rs
use crate::application::BlobStore;
use crate::domain::DomainError;
use crate::infrastructure::config::Config;
use crate::infrastructure::{build_http_client, Session};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use tracing::{debug, instrument};

/// Characters left as-is in object keys
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Blob store speaking plain HTTP object semantics (PUT / HEAD).
pub struct HttpBlobStore {
    http: reqwest::Client,
    endpoint: String,
    prefix: String,
    session: Session,
}

impl HttpBlobStore {
    pub fn new(config: &Config, session: Session) -> Result<Self, DomainError> {
        let endpoint = config.storage.endpoint.trim().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(DomainError::Config("storage.endpoint is not set".to_string()));
        }
        let http = build_http_client(&config.http)?;
        Ok(Self {
            http,
            endpoint,
            prefix: config.storage.prefix.trim_start_matches('/').to_string(),
            session,
        })
    }

    /// Locator of the object stored under `key`
    pub fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}{}",
            self.endpoint,
            self.prefix,
            utf8_percent_encode(key, KEY_ENCODE_SET)
        )
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    #[instrument(level = "debug", skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), DomainError> {
        let url = self.object_url(key);
        let response = self
            .session
            .authorize(self.http.put(&url))
            .body(bytes)
            .send()
            .await
            .map_err(|e| DomainError::Transport(format!("put {key}: {e}")))?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "Blob put");
        if !status.is_success() {
            return Err(DomainError::Blob(format!(
                "put {key}: HTTP {}",
                status.as_u16()
            )));
        }
        Ok(())
    }

    /// Unsigned object URL; a browser can only fetch it from a publicly readable prefix.
    #[instrument(level = "debug", skip(self))]
    async fn get_url(&self, key: &str) -> Result<String, DomainError> {
        let url = self.object_url(key);
        let response = self
            .session
            .authorize(self.http.head(&url))
            .send()
            .await
            .map_err(|e| DomainError::Transport(format!("head {key}: {e}")))?;

        match response.status() {
            status if status.is_success() => Ok(url),
            StatusCode::NOT_FOUND => Err(DomainError::BlobNotFound(key.to_string())),
            status => Err(DomainError::Blob(format!(
                "head {key}: HTTP {}",
                status.as_u16()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(endpoint: &str, prefix: &str) -> HttpBlobStore {
        let mut config = Config::default();
        config.storage.endpoint = endpoint.to_string();
        config.storage.prefix = prefix.to_string();
        config.auth.token = "token".to_string();
        let session = Session::resolve(&config, None).unwrap();
        HttpBlobStore::new(&config, session).unwrap()
    }

    #[test]
    fn given_plain_key_when_building_url_then_joins_endpoint_and_prefix() {
        let store = store("https://bucket.example.com/", "public/");

        assert_eq!(
            store.object_url("cat.png"),
            "https://bucket.example.com/public/cat.png"
        );
    }

    #[test]
    fn given_key_with_spaces_when_building_url_then_percent_encodes() {
        let store = store("https://bucket.example.com", "public/");

        assert_eq!(
            store.object_url("my cat #1.png"),
            "https://bucket.example.com/public/my%20cat%20%231.png"
        );
    }

    #[test]
    fn given_missing_endpoint_when_creating_then_returns_config_error() {
        let mut config = Config::default();
        config.auth.token = "token".to_string();
        let session = Session::resolve(&config, None).unwrap();

        let result = HttpBlobStore::new(&config, session);

        assert!(matches!(result, Err(DomainError::Config(_))));
    }
}
