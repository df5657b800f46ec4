//! Typed REST client for the CEMS backend.
//!
//! One [`CemsApi`] instance wraps a `reqwest::Client`, the configured
//! base URL, and an injected [`CredentialStore`]. Every request carries
//! `Authorization: Bearer <token>` and `Content-Type: application/json`;
//! non-2xx statuses map onto [`ClientError`] variants.

mod activities;
mod clubs;
mod dashboard;
mod notifications;
mod reports;
mod users;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::{CredentialStore, Credentials};
use crate::config::Config;
use crate::errors::ClientError;

pub struct CemsApi {
    base_url: String,
    http: reqwest::Client,
    /// Client without a total-request timeout; the notification stream
    /// stays open indefinitely and must not be cut off by it.
    stream_http: reqwest::Client,
    credentials: Arc<dyn CredentialStore>,
}

impl CemsApi {
    pub fn new(
        config: &Config,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, ClientError> {
        let user_agent = concat!("cems-client/", env!("CARGO_PKG_VERSION"));

        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        let stream_http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            stream_http,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn creds(&self) -> Result<Credentials, ClientError> {
        self.credentials.current().await
    }

    pub(crate) fn stream_client(&self) -> &reqwest::Client {
        &self.stream_http
    }

    // ── Request helpers ──────────────────────────────────────────

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let creds = self.creds().await?;
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(&creds.token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Self::decode_json(resp).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let creds = self.creds().await?;
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(&creds.token)
            .json(body)
            .send()
            .await?;
        Self::decode_json(resp).await
    }

    pub(crate) async fn put_unit(&self, path: &str) -> Result<(), ClientError> {
        let creds = self.creds().await?;
        let resp = self
            .http
            .put(self.url(path))
            .bearer_auth(&creds.token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Self::expect_success(resp).await
    }

    pub(crate) async fn delete_unit(&self, path: &str) -> Result<(), ClientError> {
        let creds = self.creds().await?;
        let resp = self
            .http
            .delete(self.url(path))
            .bearer_auth(&creds.token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Self::expect_success(resp).await
    }

    /// Check status, then parse the body through serde so decode
    /// failures surface as `ClientError::Decode` with detail.
    async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status.as_u16(), body));
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(ClientError::Decode)
    }

    async fn expect_success(resp: reqwest::Response) -> Result<(), ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status.as_u16(), body));
        }
        Ok(())
    }
}
