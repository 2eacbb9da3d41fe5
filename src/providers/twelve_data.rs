//! Twelve Data client - quote and daily time-series lookups
//!
//! Twelve Data reports errors inside a 200 body as a numeric `"code"`
//! field; quota exhaustion arrives either as HTTP 429 or as
//! `"code": 429` with a human-readable `"message"`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::providers::{DailyBar, ProviderError, QuoteProvider};

const PROVIDER_ID: &str = "TWELVE_DATA";

/// Twelve Data HTTP client
pub struct TwelveDataClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TwelveDataClient {
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

    /// Issue one GET against the given endpoint and classify the outcome.
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        symbol: &str,
    ) -> Result<Value, ProviderError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", &self.api_key));

        let url =
            reqwest::Url::parse_with_params(&format!("{}/{}", self.base_url, endpoint), &all_params)
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
        // A quota response may carry a garbled body, so classification
        // runs against whatever parsed (Null for unparseable bodies).
        let body: Value = response.json().await.unwrap_or(Value::Null);

        classify(status, &body, symbol)?;
        Ok(body)
    }
}

/// Map an HTTP status plus parsed body into the provider outcome.
///
/// The quota check runs before the not-found check: a quota response also
/// carries a `"code"` field and would otherwise be mistaken for not-found.
fn classify(status: u16, body: &Value, symbol: &str) -> Result<(), ProviderError> {
    let embedded_code = body.get("code").and_then(Value::as_i64);

    if status == 429 || embedded_code == Some(429) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("API quota exceeded.")
            .to_string();
        return Err(ProviderError::QuotaExceeded {
            provider: PROVIDER_ID,
            message,
        });
    }

    if embedded_code.is_some() {
        return Err(ProviderError::SymbolNotFound {
            provider: PROVIDER_ID,
            symbol: symbol.to_string(),
        });
    }

    if !(200..300).contains(&status) {
        return Err(ProviderError::Transport {
            provider: PROVIDER_ID,
            cause: format!("HTTP {status}"),
        });
    }

    if body.as_object().map_or(true, |obj| obj.is_empty()) {
        return Err(ProviderError::SymbolNotFound {
            provider: PROVIDER_ID,
            symbol: symbol.to_string(),
        });
    }

    Ok(())
}

/// Extract the typed daily bars from a time-series body.
///
/// An absent or empty `"values"` collection counts as not-found: the
/// provider answers 200 with no data for symbols it cannot chart.
fn parse_series(body: &Value, symbol: &str) -> Result<Vec<DailyBar>, ProviderError> {
    match body.get("values").and_then(Value::as_array) {
        Some(rows) if !rows.is_empty() => serde_json::from_value(Value::Array(rows.clone()))
            .map_err(|e| ProviderError::InvalidPayload {
                provider: PROVIDER_ID,
                cause: format!("failed to parse time series values: {e}"),
            }),
        _ => Err(ProviderError::SymbolNotFound {
            provider: PROVIDER_ID,
            symbol: symbol.to_string(),
        }),
    }
}

#[async_trait]
impl QuoteProvider for TwelveDataClient {
    async fn quote(&self, symbol: &str) -> Result<Value, ProviderError> {
        let result = self.fetch("quote", &[("symbol", symbol)], symbol).await;

        if let Err(ref err) = result {
            tracing::error!("Twelve Data quote lookup for '{}' failed: {}", symbol, err);
        }

        result
    }

    async fn time_series(
        &self,
        symbol: &str,
        days: usize,
    ) -> Result<Vec<DailyBar>, ProviderError> {
        let outputsize = days.to_string();
        let params = [
            ("symbol", symbol),
            ("interval", "1day"),
            ("outputsize", outputsize.as_str()),
        ];

        let result = match self.fetch("time_series", &params, symbol).await {
            Ok(body) => parse_series(&body, symbol),
            Err(err) => Err(err),
        };

        if let Err(ref err) = result {
            tracing::error!("Twelve Data time series for '{}' failed: {}", symbol, err);
        }

        result
    }
}
