//! Symbol resolver - creation-time validation against the quote provider
//!
//! Exactly one quote lookup per validation, no retry, no fallback to the
//! secondary provider. A quota or transport failure rejects the creation
//! with an upstream-unavailable reason rather than masquerading as an
//! invalid symbol.

use std::sync::Arc;

use crate::providers::{ProviderError, QuoteProvider};
use crate::registry::RegistryError;

/// Validates candidate symbols against the designated quote provider
pub struct SymbolResolver {
    provider: Arc<dyn QuoteProvider>,
}

impl SymbolResolver {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    /// Accept the symbol if the provider knows it; reject otherwise.
    pub async fn validate(&self, symbol: &str) -> Result<(), RegistryError> {
        match self.provider.quote(symbol).await {
            Ok(_) => Ok(()),
            Err(ProviderError::SymbolNotFound { .. }) => {
                tracing::error!("Symbol '{}' is not valid", symbol);
                Err(RegistryError::InvalidSymbol(symbol.to_string()))
            }
            Err(err) => {
                tracing::error!("Symbol resolution for '{}' hit upstream failure: {}", symbol, err);
                Err(RegistryError::UpstreamUnavailable(err.to_string()))
            }
        }
    }
}
