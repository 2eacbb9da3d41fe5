//! Record service - CRUD over the company collection
//!
//! Composes the store, the symbol resolver, and the provider clients.
//! Creation validates the symbol upstream before anything is persisted;
//! updates never re-validate. Provider calls are awaited without holding
//! any store lock.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::models::{
    normalize_symbol, Company, CompanyPatch, NewCompany, DESCRIPTION_MAX_LEN, NAME_MAX_LEN,
    SYMBOL_MAX_LEN,
};
use crate::providers::{DailyBar, OverviewProvider, ProviderError, QuoteProvider};
use crate::registry::query::{search, Page, QuerySpec};
use crate::registry::resolver::SymbolResolver;
use crate::registry::store::CompanyStore;
use crate::registry::RegistryError;

/// Number of daily bars attached to a detail read with market data
pub const MARKET_WINDOW_DAYS: usize = 7;

/// Raw fields of a create or update request, all optional so the service
/// owns the presence checks
#[derive(Debug, Clone, Default)]
pub struct CompanyInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub symbol: Option<String>,
}

/// A company plus, when requested, its market-data window
#[derive(Debug, Clone)]
pub struct CompanyRecord {
    pub company: Company,
    pub market_data: Option<Vec<DailyBar>>,
}

/// Which provider capability serves an external lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    /// Twelve Data quote (default)
    Quote,
    /// Alpha Vantage company overview
    Overview,
}

impl LookupSource {
    /// Parse the `source` query parameter; unknown values fall back to quote.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("overview") => LookupSource::Overview,
            _ => LookupSource::Quote,
        }
    }
}

/// The record service owning all company operations
pub struct CompanyService {
    store: Arc<dyn CompanyStore>,
    resolver: SymbolResolver,
    quotes: Arc<dyn QuoteProvider>,
    overviews: Arc<dyn OverviewProvider>,
}

impl CompanyService {
    pub fn new(
        store: Arc<dyn CompanyStore>,
        quotes: Arc<dyn QuoteProvider>,
        overviews: Arc<dyn OverviewProvider>,
    ) -> Self {
        Self {
            store,
            resolver: SymbolResolver::new(quotes.clone()),
            quotes,
            overviews,
        }
    }

    /// Create a company after resolving its symbol upstream.
    ///
    /// Order matters and matches the wire contract: symbol presence,
    /// duplicate check, provider resolution, remaining field validation,
    /// then the insert (which re-checks uniqueness atomically).
    pub async fn create(&self, input: CompanyInput) -> Result<Company, RegistryError> {
        let symbol = input
            .symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(RegistryError::MissingSymbol)?;
        let symbol = normalize_symbol(symbol);

        if self.store.symbol_exists(&symbol).await? {
            tracing::error!("Rejected create: symbol '{}' already exists", symbol);
            return Err(RegistryError::DuplicateSymbol(symbol));
        }

        self.resolver.validate(&symbol).await?;

        if symbol.chars().count() > SYMBOL_MAX_LEN {
            return Err(RegistryError::Validation(format!(
                "Symbol must be {SYMBOL_MAX_LEN} characters or fewer."
            )));
        }
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| RegistryError::Validation("Name is required.".to_string()))?;
        if name.chars().count() > NAME_MAX_LEN {
            return Err(RegistryError::Validation(format!(
                "Name must be {NAME_MAX_LEN} characters or fewer."
            )));
        }
        if let Some(ref description) = input.description {
            if description.chars().count() > DESCRIPTION_MAX_LEN {
                return Err(RegistryError::Validation(format!(
                    "Description must be {DESCRIPTION_MAX_LEN} characters or fewer."
                )));
            }
        }

        let company = self
            .store
            .insert(NewCompany {
                name: name.to_string(),
                description: input.description,
                symbol,
            })
            .await?;

        tracing::info!("Created company '{}' ({})", company.symbol, company.id);
        Ok(company)
    }

    /// Fetch one company, optionally attaching its market-data window.
    ///
    /// When the provider reports the stored symbol as not found, the whole
    /// read degrades to not-found even though the record exists. Clients
    /// depend on this documented behavior; the degrade is logged so the
    /// situation stays diagnosable.
    pub async fn get(&self, id: Uuid, include_market: bool) -> Result<CompanyRecord, RegistryError> {
        let company = self.store.get(id).await?.ok_or_else(|| {
            tracing::error!("Company with id {} not found", id);
            RegistryError::NotFound
        })?;

        if !include_market {
            return Ok(CompanyRecord {
                company,
                market_data: None,
            });
        }

        match self.quotes.time_series(&company.symbol, MARKET_WINDOW_DAYS).await {
            Ok(bars) => Ok(CompanyRecord {
                company,
                market_data: Some(bars),
            }),
            Err(ProviderError::SymbolNotFound { .. }) => {
                tracing::error!(
                    "Market data for '{}' (company {}) not found upstream; degrading read to not-found",
                    company.symbol,
                    company.id
                );
                Err(RegistryError::SymbolUnknown(company.symbol))
            }
            Err(err) => Err(RegistryError::UpstreamUnavailable(err.to_string())),
        }
    }

    /// Partial update. The symbol is re-uppercased if present; no provider
    /// re-validation happens on update.
    pub async fn update(&self, id: Uuid, input: CompanyInput) -> Result<Company, RegistryError> {
        let mut patch = CompanyPatch::default();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(RegistryError::Validation("Name is required.".to_string()));
            }
            if name.chars().count() > NAME_MAX_LEN {
                return Err(RegistryError::Validation(format!(
                    "Name must be {NAME_MAX_LEN} characters or fewer."
                )));
            }
            patch.name = Some(name);
        }
        if let Some(description) = input.description {
            if description.chars().count() > DESCRIPTION_MAX_LEN {
                return Err(RegistryError::Validation(format!(
                    "Description must be {DESCRIPTION_MAX_LEN} characters or fewer."
                )));
            }
            patch.description = Some(description);
        }
        if let Some(symbol) = input.symbol {
            let symbol = normalize_symbol(&symbol);
            if symbol.is_empty() || symbol.chars().count() > SYMBOL_MAX_LEN {
                return Err(RegistryError::Validation(format!(
                    "Symbol must be between 1 and {SYMBOL_MAX_LEN} characters."
                )));
            }
            patch.symbol = Some(symbol);
        }

        let company = self.store.update(id, patch).await?;
        Ok(company)
    }

    /// Remove a company. Deleting an unknown id is an error, not a no-op.
    pub async fn delete(&self, id: Uuid) -> Result<(), RegistryError> {
        if self.store.delete(id).await? {
            tracing::info!("Company with id {} deleted", id);
            Ok(())
        } else {
            tracing::error!("Company with id {} not found", id);
            Err(RegistryError::NotFound)
        }
    }

    /// One page of companies matching the query spec.
    pub async fn list(&self, spec: &QuerySpec) -> Result<Page, RegistryError> {
        let companies = self.store.all().await?;
        Ok(search(companies, spec))
    }

    /// Raw provider payload for a symbol, without touching the collection.
    pub async fn external_lookup(
        &self,
        symbol: &str,
        source: LookupSource,
    ) -> Result<Value, RegistryError> {
        let result = match source {
            LookupSource::Quote => self.quotes.quote(symbol).await,
            LookupSource::Overview => self.overviews.overview(symbol).await,
        };

        result.map_err(|err| match err {
            ProviderError::SymbolNotFound { .. } => {
                RegistryError::SymbolUnknown(symbol.to_string())
            }
            other => RegistryError::UpstreamUnavailable(other.to_string()),
        })
    }
}
