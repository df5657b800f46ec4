use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the CEMS REST API, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    /// Bearer token for authenticated calls. Optional at load time;
    /// calls that need it fail with `MissingCredentials`.
    pub token: Option<String>,
    /// User the client acts as.
    pub user_id: Option<i64>,
    /// First reconnect delay after a dropped notification stream.
    /// Set via CEMS_RECONNECT_BASE_SECS. Default: 5.
    pub reconnect_base: Duration,
    /// Ceiling for the exponential reconnect backoff.
    /// Set via CEMS_RECONNECT_MAX_SECS. Default: 300.
    pub reconnect_max: Duration,
    /// Consecutive stream failures before the session is flagged degraded.
    /// Set via CEMS_DEGRADED_AFTER. Default: 5.
    pub degraded_after: u32,
    /// Timeout for plain (non-streaming) HTTP requests.
    /// Set via CEMS_HTTP_TIMEOUT_SECS. Default: 30.
    pub http_timeout: Duration,
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let base_url = std::env::var("CEMS_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8080/api".into());

    url::Url::parse(&base_url)
        .with_context(|| format!("CEMS_BASE_URL is not a valid URL: {base_url}"))?;

    Ok(Config {
        base_url,
        token: std::env::var("CEMS_TOKEN").ok().filter(|t| !t.is_empty()),
        user_id: std::env::var("CEMS_USER_ID").ok().and_then(|v| v.parse().ok()),
        reconnect_base: Duration::from_secs(env_u64("CEMS_RECONNECT_BASE_SECS", 5)),
        reconnect_max: Duration::from_secs(env_u64("CEMS_RECONNECT_MAX_SECS", 300)),
        degraded_after: env_u64("CEMS_DEGRADED_AFTER", 5) as u32,
        http_timeout: Duration::from_secs(env_u64("CEMS_HTTP_TIMEOUT_SECS", 30)),
    })
}

impl Default for Config {
    /// Defaults used by tests and embedders that configure programmatically.
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".into(),
            token: None,
            user_id: None,
            reconnect_base: Duration::from_secs(5),
            reconnect_max: Duration::from_secs(300),
            degraded_after: 5,
            http_timeout: Duration::from_secs(30),
        }
    }
}
