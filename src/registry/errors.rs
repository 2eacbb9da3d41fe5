//! Error types for company registry operations
//!
//! Every core-component failure funnels into `RegistryError`; the API
//! layer translates each variant into a status code plus a short
//! `detail` message, and nothing is silently swallowed on the way.

use thiserror::Error;

use crate::registry::store::StoreError;

/// Errors that can occur during registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Create request arrived without a symbol
    #[error("Symbol is required.")]
    MissingSymbol,

    /// A field failed length/type validation
    #[error("{0}")]
    Validation(String),

    /// Another company already holds this symbol (case-insensitively)
    #[error("A company with symbol '{0}' already exists.")]
    DuplicateSymbol(String),

    /// No company record with the requested identifier
    #[error("Company not found.")]
    NotFound,

    /// The provider does not recognize the symbol
    #[error("Symbol '{0}' not found.")]
    SymbolUnknown(String),

    /// The provider rejected the symbol during creation
    #[error("The symbol '{0}' is not valid.")]
    InvalidSymbol(String),

    /// Quota exhaustion or transport failure at the provider boundary
    #[error("Upstream provider unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Persistence layer failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RegistryError {
    /// Returns true if the caller can fix this by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RegistryError::MissingSymbol
                | RegistryError::Validation(_)
                | RegistryError::DuplicateSymbol(_)
                | RegistryError::InvalidSymbol(_)
        )
    }

    /// Returns true if the requested resource (record or symbol) is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::NotFound | RegistryError::SymbolUnknown(_)
        )
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateSymbol(symbol) => RegistryError::DuplicateSymbol(symbol),
            StoreError::NotFound => RegistryError::NotFound,
            StoreError::Backend(cause) => RegistryError::Storage(cause),
        }
    }
}
