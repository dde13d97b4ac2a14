//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LAREK_API_ORIGIN` - Origin of the web-larek service (e.g., <https://larek-api.nomoreparties.co>)
//!
//! ## Optional
//! - `LAREK_API_PATH` - API base path (default: /api/weblarek)
//! - `LAREK_CDN_PATH` - Product image base path (default: /content/weblarek)
//! - `LAREK_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 10)
//! - `LAREK_CATALOG_CACHE_TTL_SECS` - Product list cache lifetime (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_PATH: &str = "/api/weblarek";
const DEFAULT_CDN_PATH: &str = "/content/weblarek";
const DEFAULT_REQUEST_TIMEOUT_SECS: &str = "10";
const DEFAULT_CATALOG_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL for API requests (origin + API path)
    pub api_base_url: Url,
    /// Base URL product image paths are appended to
    pub cdn_base_url: Url,
    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,
    /// How long a fetched product list is served from memory
    pub catalog_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let origin = env.required("LAREK_API_ORIGIN")?;
        let api_path = env.or_default("LAREK_API_PATH", DEFAULT_API_PATH);
        let cdn_path = env.or_default("LAREK_CDN_PATH", DEFAULT_CDN_PATH);

        let api_base_url = join_origin(&origin, &api_path)
            .map_err(|e| ConfigError::InvalidEnvVar("LAREK_API_ORIGIN".to_string(), e))?;
        let cdn_base_url = join_origin(&origin, &cdn_path)
            .map_err(|e| ConfigError::InvalidEnvVar("LAREK_API_ORIGIN".to_string(), e))?;

        let request_timeout = env.seconds("LAREK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let catalog_cache_ttl =
            env.seconds("LAREK_CATALOG_CACHE_TTL_SECS", DEFAULT_CATALOG_CACHE_TTL_SECS)?;

        Ok(Self {
            api_base_url,
            cdn_base_url,
            request_timeout,
            catalog_cache_ttl,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Join an origin and a base path into one URL, keeping the path as given.
fn join_origin(origin: &str, path: &str) -> Result<Url, String> {
    let origin = origin.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    let url = Url::parse(&format!("{origin}/{path}")).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(format!("not an http(s) origin: {origin}"));
    }
    Ok(url)
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a required variable; blank counts as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; blank counts as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a whole number of seconds.
    fn seconds(&self, key: &str, default: &str) -> Result<Duration, ConfigError> {
        self.or_default(key, default)
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}
