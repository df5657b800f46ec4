//! Credential context for authenticated API calls.
//!
//! Credentials are threaded explicitly into the API client and push
//! transport instead of being read from ambient process state inline.
//! The seam is a trait so tests and embedders can supply fakes.

use async_trait::async_trait;

use crate::config::Config;
use crate::errors::ClientError;

/// The token/user pair every authenticated call needs.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
    pub user_id: i64,
}

/// Read-only source of the current credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn current(&self) -> Result<Credentials, ClientError>;
}

/// Fixed credentials known at construction time. Used by the CLI after
/// config load and by tests.
#[derive(Debug, Clone)]
pub struct StaticCredentialStore {
    credentials: Credentials,
}

impl StaticCredentialStore {
    pub fn new(token: impl Into<String>, user_id: i64) -> Self {
        Self {
            credentials: Credentials {
                token: token.into(),
                user_id,
            },
        }
    }

    /// Build from loaded config; fails if token or user id is absent.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let token = config
            .token
            .clone()
            .ok_or(ClientError::MissingCredentials("CEMS_TOKEN"))?;
        let user_id = config
            .user_id
            .ok_or(ClientError::MissingCredentials("CEMS_USER_ID"))?;
        Ok(Self::new(token, user_id))
    }

    pub fn user_id(&self) -> i64 {
        self.credentials.user_id
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn current(&self) -> Result<Credentials, ClientError> {
        Ok(self.credentials.clone())
    }
}

/// Reads CEMS_TOKEN / CEMS_USER_ID on every call, so a rotated token is
/// picked up without rebuilding the client.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialStore;

#[async_trait]
impl CredentialStore for EnvCredentialStore {
    async fn current(&self) -> Result<Credentials, ClientError> {
        let token = std::env::var("CEMS_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or(ClientError::MissingCredentials("CEMS_TOKEN"))?;
        let user_id = std::env::var("CEMS_USER_ID")
            .ok()
            .and_then(|v| v.parse().ok())
            .ok_or(ClientError::MissingCredentials("CEMS_USER_ID"))?;
        Ok(Credentials { token, user_id })
    }
}
