use crate::constants::{
    DEFAULT_API_PREFIX, DEFAULT_API_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ENVIRONMENT,
    DEFAULT_TIMEOUT_SECS, ENV_API_PREFIX, ENV_API_URL, ENV_CONNECT_TIMEOUT_SECS, ENV_ENVIRONMENT,
    ENV_TIMEOUT_SECS,
};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Backend
    pub api_url: String,
    pub api_prefix: String,
    pub environment: String,

    // Timeouts
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Config {
            api_url: non_blank(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_prefix: non_blank(ENV_API_PREFIX)
                .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string()),
            environment: non_blank(ENV_ENVIRONMENT)
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),

            request_timeout_secs: match non_blank(ENV_TIMEOUT_SECS) {
                Some(raw) => raw.trim().parse()?,
                None => DEFAULT_TIMEOUT_SECS,
            },
            connect_timeout_secs: match non_blank(ENV_CONNECT_TIMEOUT_SECS) {
                Some(raw) => raw.trim().parse()?,
                None => DEFAULT_CONNECT_TIMEOUT_SECS,
            },
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(self.api_url.trim())
            .map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", ENV_API_URL, e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("{} must use http or https", ENV_API_URL);
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("{} must be > 0", ENV_TIMEOUT_SECS);
        }
        if self.connect_timeout_secs == 0 {
            anyhow::bail!("{} must be > 0", ENV_CONNECT_TIMEOUT_SECS);
        }

        if url.scheme() == "http" && self.is_production() {
            tracing::warn!("Production environment is talking to the API over plain http");
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let environment = self.environment.trim().to_ascii_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}
