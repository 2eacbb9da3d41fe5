use std::sync::Arc;

use company_registry_api::{
    create_router, AlphaVantageClient, AppConfig, CompanyService, InMemoryStore, TwelveDataClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "company_registry_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; the provider clients and the auth gate receive
    // it explicitly instead of reading the environment themselves
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Wire the record service: in-memory store + the two provider clients
    let store = Arc::new(InMemoryStore::new());
    let quotes = Arc::new(TwelveDataClient::new(&config.twelve_data));
    let overviews = Arc::new(AlphaVantageClient::new(&config.alpha_vantage));
    let service = Arc::new(CompanyService::new(store, quotes, overviews));

    let app = create_router(service, config.api_access_token.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap();

    tracing::info!("🚀 Company Registry API running on http://{}", config.bind_addr);
    tracing::info!("📚 Swagger UI: http://{}/swagger-ui", config.bind_addr);
    tracing::info!("📊 Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await.unwrap();
}
