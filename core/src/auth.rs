//! Bearer tokens for the Admin API: a static token from the environment, or
//! the GCE metadata server when running on platform infrastructure.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

pub const ENV_ACCESS_TOKEN: &str = "GCP_ACCESS_TOKEN";
pub const DEFAULT_METADATA_HOST: &str = "http://metadata.google.internal";

const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
// Refresh slightly before the advertised expiry.
const EXPIRY_SLACK_SECS: i64 = 30;

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

pub struct TokenSource {
    static_token: Option<String>,
    metadata_host: String,
    http: reqwest::Client,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a key-lookup closure; `GCP_ACCESS_TOKEN` short-circuits the
    /// metadata server entirely.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let static_token = lookup(ENV_ACCESS_TOKEN).filter(|v| !v.trim().is_empty());
        Self::build(static_token, DEFAULT_METADATA_HOST.to_string())
    }

    /// Metadata-server source against a non-default host.
    pub fn with_metadata_host(host: impl Into<String>) -> anyhow::Result<Self> {
        Self::build(None, host.into())
    }

    fn build(static_token: Option<String>, metadata_host: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            static_token,
            metadata_host,
            http,
            cache: Mutex::new(None),
        })
    }

    pub async fn bearer(&self) -> anyhow::Result<String> {
        if let Some(token) = &self.static_token {
            return Ok(token.clone());
        }

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.expires_at > Utc::now() {
                return Ok(cached.value.clone());
            }
        }

        let url = format!("{}{}", self.metadata_host.trim_end_matches('/'), TOKEN_PATH);
        tracing::debug!(target: "jobfan.auth", url = %url, "fetching access token");
        let resp = self
            .http
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?
            .error_for_status()?;
        let token: MetadataToken = resp.json().await?;

        let expires_at =
            Utc::now() + Duration::seconds((token.expires_in - EXPIRY_SLACK_SECS).max(0));
        *cache = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at,
        });

        Ok(token.access_token)
    }
}
