//! External financial-data provider clients
//!
//! Two upstream providers are supported, each with a fixed response
//! contract: Alpha Vantage (company overview, errors signalled by an
//! `"Error Message"` field) and Twelve Data (quote and time-series,
//! errors signalled by a numeric `"code"` field plus an HTTP 429
//! convention for quota exhaustion). Every call maps the raw response
//! into `Result<payload, ProviderError>` so callers pattern-match
//! exhaustively instead of relying on catch-order.

pub mod alpha_vantage;
pub mod twelve_data;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub use alpha_vantage::AlphaVantageClient;
pub use twelve_data::TwelveDataClient;

/// Failure modes of a provider call
///
/// Quota exhaustion is a distinct variant because a quota response can
/// otherwise look like a not-found response; clients check it first.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider does not know the symbol (or returned no usable data for it)
    #[error("Symbol '{symbol}' not found on {provider}")]
    SymbolNotFound {
        provider: &'static str,
        symbol: String,
    },

    /// The provider's rate limit is exhausted (HTTP 429 or an embedded status code)
    #[error("{provider} quota exceeded: {message}")]
    QuotaExceeded {
        provider: &'static str,
        message: String,
    },

    /// Network failure or a non-2xx response unrelated to quota
    #[error("{provider} request failed: {cause}")]
    Transport {
        provider: &'static str,
        cause: String,
    },

    /// A 2xx response whose body could not be interpreted
    #[error("{provider} returned an unreadable payload: {cause}")]
    InvalidPayload {
        provider: &'static str,
        cause: String,
    },
}

impl ProviderError {
    /// Returns true if the failure came from the upstream service or the
    /// network rather than from the symbol itself.
    pub fn is_upstream_failure(&self) -> bool {
        !matches!(self, ProviderError::SymbolNotFound { .. })
    }
}

/// One daily bar from a provider time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyBar {
    /// Trading day, as reported by the provider (e.g. "2024-01-15")
    pub datetime: String,
    #[schema(value_type = String, example = "150.50")]
    pub open: Decimal,
    #[schema(value_type = String, example = "151.20")]
    pub high: Decimal,
    #[schema(value_type = String, example = "149.80")]
    pub low: Decimal,
    #[schema(value_type = String, example = "150.90")]
    pub close: Decimal,
    #[schema(value_type = Option<String>, example = "1000000")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
}

/// Quote and time-series capability (Twelve Data)
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Look up the latest quote for a symbol. The payload is the raw
    /// provider object; callers that only validate the symbol discard it.
    async fn quote(&self, symbol: &str) -> Result<serde_json::Value, ProviderError>;

    /// Fetch the last `days` daily bars for a symbol. An empty or absent
    /// values collection counts as not-found.
    async fn time_series(&self, symbol: &str, days: usize)
        -> Result<Vec<DailyBar>, ProviderError>;
}

/// Company-overview capability (Alpha Vantage)
#[async_trait]
pub trait OverviewProvider: Send + Sync {
    async fn overview(&self, symbol: &str) -> Result<serde_json::Value, ProviderError>;
}
