//! Process-wide configuration
//!
//! Loaded once at startup from the environment and handed explicitly to
//! the provider clients and the auth gate; nothing reads env vars after
//! this point.

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co";
const TWELVE_DATA_BASE_URL: &str = "https://api.twelvedata.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),
}

/// Credentials and endpoint for one upstream provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Everything the process needs to run
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Static bearer token the auth gate compares against
    pub api_access_token: String,

    pub alpha_vantage: ProviderConfig,
    pub twelve_data: ProviderConfig,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn with_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// The API keys and the access token are required; bind address and
    /// provider base URLs have defaults (the URLs are overridable so
    /// tests can point clients at a local server).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: with_default("BIND_ADDR", DEFAULT_BIND_ADDR),
            api_access_token: required("API_ACCESS_TOKEN")?,
            alpha_vantage: ProviderConfig {
                api_key: required("ALPHA_VANTAGE_API_KEY")?,
                base_url: with_default("ALPHA_VANTAGE_BASE_URL", ALPHA_VANTAGE_BASE_URL),
            },
            twelve_data: ProviderConfig {
                api_key: required("TWELVE_DATA_API_KEY")?,
                base_url: with_default("TWELVE_DATA_BASE_URL", TWELVE_DATA_BASE_URL),
            },
        })
    }
}
