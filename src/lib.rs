// Library Crate Root
// lib.rs

pub mod api;
pub mod config;
pub mod models;
pub mod providers;
pub mod registry;

// pub use = re-export at crate root
pub use api::{create_router, AppState};
pub use config::{AppConfig, ProviderConfig};
pub use models::Company;
pub use providers::{AlphaVantageClient, TwelveDataClient};
pub use registry::{CompanyService, InMemoryStore, RegistryError};
