//! Company record store
//!
//! The store is the single shared resource of the service. The trait
//! keeps the persistence boundary abstract; the in-memory implementation
//! enforces the symbol-uniqueness invariant under its own write guard, so
//! two concurrent creates with the same symbol resolve to exactly one
//! success and one duplicate rejection regardless of what the service
//! checked beforehand.

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Company, CompanyPatch, NewCompany};

/// Errors raised at the storage boundary
#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness constraint on `symbol` violated
    #[error("symbol '{0}' already exists")]
    DuplicateSymbol(String),

    /// No record with the requested identifier
    #[error("record not found")]
    NotFound,

    /// Backend failure (connection loss, I/O error) in non-memory implementations
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Keyed record store for companies
///
/// Implementations must keep insertion order observable through `all`
/// (the query engine's stable sort breaks ties by it) and must enforce
/// symbol uniqueness atomically inside `insert` and `update`.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Insert a new record, assigning its identifier.
    async fn insert(&self, new: NewCompany) -> Result<Company, StoreError>;

    /// Fetch a record by identifier.
    async fn get(&self, id: Uuid) -> Result<Option<Company>, StoreError>;

    /// Whether any record holds this (already uppercased) symbol.
    async fn symbol_exists(&self, symbol: &str) -> Result<bool, StoreError>;

    /// Merge a partial update into an existing record.
    async fn update(&self, id: Uuid, patch: CompanyPatch) -> Result<Company, StoreError>;

    /// Remove a record by identifier. Returns false if it was absent.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// All records in insertion order.
    async fn all(&self) -> Result<Vec<Company>, StoreError>;
}

/// In-memory store backed by a single RwLock'd vector
///
/// The vector keeps insertion order; uniqueness checks and mutations
/// happen under the same write guard.
#[derive(Default)]
pub struct InMemoryStore {
    companies: RwLock<Vec<Company>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn symbol_taken(companies: &[Company], symbol: &str, except: Option<Uuid>) -> bool {
        companies
            .iter()
            .any(|c| c.symbol.eq_ignore_ascii_case(symbol) && Some(c.id) != except)
    }
}

#[async_trait]
impl CompanyStore for InMemoryStore {
    async fn insert(&self, new: NewCompany) -> Result<Company, StoreError> {
        let mut companies = self.companies.write();

        if Self::symbol_taken(&companies, &new.symbol, None) {
            return Err(StoreError::DuplicateSymbol(new.symbol));
        }

        let company = Company {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            symbol: new.symbol,
        };
        companies.push(company.clone());
        Ok(company)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Company>, StoreError> {
        Ok(self.companies.read().iter().find(|c| c.id == id).cloned())
    }

    async fn symbol_exists(&self, symbol: &str) -> Result<bool, StoreError> {
        Ok(Self::symbol_taken(&self.companies.read(), symbol, None))
    }

    async fn update(&self, id: Uuid, patch: CompanyPatch) -> Result<Company, StoreError> {
        let mut companies = self.companies.write();

        if let Some(ref symbol) = patch.symbol {
            if Self::symbol_taken(&companies, symbol, Some(id)) {
                return Err(StoreError::DuplicateSymbol(symbol.clone()));
            }
        }

        let company = companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;

        if let Some(name) = patch.name {
            company.name = name;
        }
        if let Some(description) = patch.description {
            company.description = Some(description);
        }
        if let Some(symbol) = patch.symbol {
            company.symbol = symbol;
        }

        Ok(company.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut companies = self.companies.write();
        let before = companies.len();
        companies.retain(|c| c.id != id);
        Ok(companies.len() < before)
    }

    async fn all(&self) -> Result<Vec<Company>, StoreError> {
        Ok(self.companies.read().clone())
    }
}
