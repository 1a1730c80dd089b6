//! Feed service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WOOCOMMERCE_URL` - Base URL of the WordPress site (e.g., <https://shop.example.ru>)
//! - `WOOCOMMERCE_CONSUMER_KEY` - REST API consumer key (`ck_...`)
//! - `WOOCOMMERCE_CONSUMER_SECRET` - REST API consumer secret (`cs_...`)
//!
//! ## Optional
//! - `FEED_HOST` - Bind address (default: 127.0.0.1)
//! - `FEED_PORT` - Listen port (default: 3000)
//! - `WOOCOMMERCE_PAGE_SIZE` - Items per REST page, 1-100 (default: 100)
//! - `WOOCOMMERCE_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MAX_PAGE_SIZE: u32 = 100;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Feed service configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// WooCommerce REST API configuration
    pub woocommerce: WooCommerceConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// WooCommerce REST API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct WooCommerceConfig {
    /// Base URL of the WordPress installation
    pub base_url: Url,
    /// REST API consumer key
    pub consumer_key: String,
    /// REST API consumer secret
    pub consumer_secret: SecretString,
    /// Items requested per page
    pub page_size: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for WooCommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCommerceConfig")
            .field("base_url", &self.base_url.as_str())
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FeedConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("FEED_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FEED_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FEED_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FEED_PORT".to_string(), e.to_string()))?;

        let woocommerce = WooCommerceConfig::from_env()?;

        let sentry_sample_rate =
            parse_sample_rate("SENTRY_SAMPLE_RATE", &get_env_or_default("SENTRY_SAMPLE_RATE", "1.0"))?;
        let sentry_traces_sample_rate = parse_sample_rate(
            "SENTRY_TRACES_SAMPLE_RATE",
            &get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0"),
        )?;

        Ok(Self {
            host,
            port,
            woocommerce,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl WooCommerceConfig {
    /// Load only the WooCommerce section (used by the CLI, which never binds a socket).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(&get_required_env("WOOCOMMERCE_URL")?)?;
        let page_size = parse_page_size(&get_env_or_default("WOOCOMMERCE_PAGE_SIZE", "100"))?;
        let timeout_secs = get_env_or_default("WOOCOMMERCE_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("WOOCOMMERCE_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url,
            consumer_key: get_required_env("WOOCOMMERCE_CONSUMER_KEY")?,
            consumer_secret: get_validated_secret("WOOCOMMERCE_CONSUMER_SECRET")?,
            page_size,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the site URL, normalizing it to end with a slash so joins stay under it.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("WOOCOMMERCE_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "WOOCOMMERCE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parse the REST page size; WooCommerce caps `per_page` at 100.
fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("WOOCOMMERCE_PAGE_SIZE".to_string(), msg);
    let size = raw.parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(invalid(format!("must be between 1 and {MAX_PAGE_SIZE} (got {size})")));
    }
    Ok(size)
}

/// Parse a Sentry sample rate in `0.0..=1.0`.
fn parse_sample_rate(key: &str, raw: &str) -> Result<f32, ConfigError> {
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Generated WooCommerce secrets are 40 hex chars with a `cs_` prefix
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key generated by WooCommerce."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
