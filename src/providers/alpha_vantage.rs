//! Alpha Vantage client - company overview lookup
//!
//! Alpha Vantage signals an unknown symbol with an `"Error Message"`
//! field or an entirely empty JSON object; quota exhaustion is an
//! HTTP 429.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::providers::{OverviewProvider, ProviderError};

const PROVIDER_ID: &str = "ALPHA_VANTAGE";

/// Alpha Vantage HTTP client
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageClient {
    /// Create a client from injected provider configuration.
    pub fn new(config: &ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_overview(&self, symbol: &str) -> Result<Value, ProviderError> {
        let params = [
            ("function", "OVERVIEW"),
            ("symbol", symbol),
            ("apikey", self.api_key.as_str()),
        ];

        let url = reqwest::Url::parse_with_params(&format!("{}/query", self.base_url), &params)
            .map_err(|e| ProviderError::Transport {
                provider: PROVIDER_ID,
                cause: format!("failed to build URL: {e}"),
            })?;

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| ProviderError::Transport {
                    provider: PROVIDER_ID,
                    cause: e.to_string(),
                })?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(ProviderError::QuotaExceeded {
                provider: PROVIDER_ID,
                message: "API quota exceeded.".to_string(),
            });
        }
        if !(200..300).contains(&status) {
            return Err(ProviderError::Transport {
                provider: PROVIDER_ID,
                cause: format!("HTTP {status}"),
            });
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        interpret(&body, symbol)?;
        Ok(body)
    }
}

/// Decide whether a 2xx overview body actually contains data.
///
/// The API answers 200 with an empty object for unknown symbols, and
/// 200 with an `"Error Message"` field for malformed requests; both
/// count as not-found.
fn interpret(body: &Value, symbol: &str) -> Result<(), ProviderError> {
    let empty = body.as_object().map_or(true, |obj| obj.is_empty());
    if empty || body.get("Error Message").is_some() {
        return Err(ProviderError::SymbolNotFound {
            provider: PROVIDER_ID,
            symbol: symbol.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl OverviewProvider for AlphaVantageClient {
    async fn overview(&self, symbol: &str) -> Result<Value, ProviderError> {
        let result = self.fetch_overview(symbol).await;

        if let Err(ref err) = result {
            tracing::error!("Alpha Vantage overview for '{}' failed: {}", symbol, err);
        }

        result
    }
}
