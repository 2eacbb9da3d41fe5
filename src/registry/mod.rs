//! Company registry - record store, query engine, symbol resolver, and
//! the record service composing them

pub mod errors;
pub mod query;
pub mod resolver;
pub mod service;
pub mod store;

pub use errors::RegistryError;
pub use query::{Page, QuerySpec};
pub use resolver::SymbolResolver;
pub use service::{CompanyInput, CompanyRecord, CompanyService, LookupSource};
pub use store::{CompanyStore, InMemoryStore, StoreError};
