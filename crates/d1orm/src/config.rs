//! Client configuration.

use crate::error::{OrmError, OrmResult};
use std::fmt;
use std::time::Duration;

/// Default Cloudflare API root.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

pub const ENV_ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";
pub const ENV_DATABASE_ID: &str = "CLOUDFLARE_DATABASE_ID";
pub const ENV_API_KEY: &str = "CLOUDFLARE_API_KEY";
pub const ENV_BASE_URL: &str = "CLOUDFLARE_D1_BASE_URL";

/// Configuration for `D1Client`.
///
/// The three credentials are resolved once by the caller (or [`D1Config::from_env`])
/// and then owned by the client.
#[derive(Clone)]
pub struct D1Config {
    /// Cloudflare account identifier.
    pub account_id: String,
    /// D1 database identifier.
    pub database_id: String,
    /// API bearer token.
    pub api_token: String,
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout. `None` waits for the full response.
    pub timeout: Option<Duration>,
}

impl D1Config {
    /// Create a configuration with the default API root and no timeout.
    pub fn new(
        account_id: impl Into<String>,
        database_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            database_id: database_id.into(),
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Read `CLOUDFLARE_ACCOUNT_ID`, `CLOUDFLARE_DATABASE_ID` and `CLOUDFLARE_API_KEY`
    /// (plus the optional `CLOUDFLARE_D1_BASE_URL`) from the process environment.
    pub fn from_env() -> OrmResult<Self> {
        let mut config = Self::new(
            require_env(ENV_ACCOUNT_ID)?,
            require_env(ENV_DATABASE_ID)?,
            require_env(ENV_API_KEY)?,
        );
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            config = config.base_url(base_url);
        }
        Ok(config)
    }

    /// Override the API root (useful for proxies and local test servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Check that no credential is blank.
    pub fn validate(&self) -> OrmResult<()> {
        for (name, value) in [
            ("account_id", &self.account_id),
            ("database_id", &self.database_id),
            ("api_token", &self.api_token),
        ] {
            if value.trim().is_empty() {
                return Err(OrmError::Config(format!("{name} is empty")));
            }
        }
        Ok(())
    }

    /// The per-account, per-database query endpoint.
    pub fn query_url(&self) -> String {
        format!(
            "{}/accounts/{}/d1/database/{}/query",
            self.base_url, self.account_id, self.database_id
        )
    }
}

impl fmt::Debug for D1Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("D1Config")
            .field("account_id", &self.account_id)
            .field("database_id", &self.database_id)
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn require_env(name: &str) -> OrmResult<String> {
    std::env::var(name).map_err(|_| OrmError::Config(format!("missing environment variable {name}")))
}
