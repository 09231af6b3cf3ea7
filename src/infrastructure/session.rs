// src/infrastructure/session.rs
use crate::constants::TOKEN_ENV_VAR;
use crate::domain::DomainError;
use crate::infrastructure::config::{AuthMode, Config};
use anyhow::Result;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Credentials issued by the identity provider.
///
/// Holding a `Session` is the proof of sign-in: backend clients can only be
/// built from one.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    mode: AuthMode,
    token: String,
}

impl Session {
    /// Build from config, letting `NOTEBOARD_TOKEN` override the stored token
    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        Self::resolve(config, std::env::var(TOKEN_ENV_VAR).ok())
    }

    pub fn resolve(config: &Config, env_token: Option<String>) -> Result<Self, DomainError> {
        let token = env_token
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| config.auth.token.clone());
        let token = token.trim().to_string();

        if token.is_empty() {
            return Err(DomainError::NotAuthenticated);
        }
        debug!(mode = ?config.auth.mode, "Session established");
        Ok(Self {
            mode: config.auth.mode,
            token,
        })
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Attach credentials to an outgoing request
    pub fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.mode {
            AuthMode::Bearer => request.bearer_auth(&self.token),
            AuthMode::ApiKey => request.header("x-api-key", &self.token),
        }
    }

    /// Forget the stored token. Note state is left alone.
    pub fn sign_out(config_path: impl AsRef<Path>) -> Result<()> {
        let path = config_path.as_ref();
        let mut config = Config::load(path)?;
        config.auth.token.clear();
        config.save(path)?;
        info!(path = %path.display(), "Signed out");
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with_token(token: &str) -> Config {
        let mut config = Config::default();
        config.auth.token = token.to_string();
        config
    }

    #[test]
    fn given_no_token_when_resolving_session_then_not_authenticated() {
        let result = Session::resolve(&config_with_token("  "), None);

        assert_eq!(result, Err(DomainError::NotAuthenticated));
    }

    #[test]
    fn given_env_token_when_resolving_session_then_overrides_config() {
        let session = Session::resolve(&config_with_token("stored"), Some("from-env".to_string()))
            .expect("Session should resolve");

        assert_eq!(session.token, "from-env");
    }

    #[test]
    fn given_blank_env_token_when_resolving_session_then_falls_back_to_config() {
        let session = Session::resolve(&config_with_token("stored"), Some(String::new()))
            .expect("Session should resolve");

        assert_eq!(session.token, "stored");
    }

    #[test]
    fn given_session_when_debug_printing_then_hides_token() {
        let session = Session::resolve(&config_with_token("secret"), None).unwrap();

        assert!(!format!("{session:?}").contains("secret"));
    }

    #[test]
    fn given_stored_token_when_signing_out_then_clears_only_token() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut config = config_with_token("secret");
        config.api.endpoint = "https://api.example.com/graphql".to_string();
        config.save(&path).unwrap();

        Session::sign_out(&path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.auth.token, "");
        assert_eq!(reloaded.api.endpoint, "https://api.example.com/graphql");
    }
}
