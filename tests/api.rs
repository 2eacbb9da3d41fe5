//! End-to-end router tests
//!
//! The provider clients are replaced by an in-process fake implementing
//! the provider traits, so every HTTP behavior (auth gate, status
//! mapping, pagination, provider failure handling) is exercised without
//! a network.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use company_registry_api::providers::{
    DailyBar, OverviewProvider, ProviderError, QuoteProvider,
};
use company_registry_api::{create_router, CompanyService, InMemoryStore};

const TOKEN: &str = "test-access-token";

/// Fake market-data backend shared by both provider traits
struct FakeMarket {
    /// Symbols the quote endpoint recognizes
    known: HashSet<String>,
    /// Symbols with time-series data (subset of `known`)
    chartable: HashSet<String>,
    /// When set, every call answers with quota exhaustion
    quota_exhausted: AtomicBool,
}

impl FakeMarket {
    fn new(known: &[&str], chartable: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            known: known.iter().map(|s| s.to_string()).collect(),
            chartable: chartable.iter().map(|s| s.to_string()).collect(),
            quota_exhausted: AtomicBool::new(false),
        })
    }

    fn set_quota_exhausted(&self, exhausted: bool) {
        self.quota_exhausted.store(exhausted, Ordering::SeqCst);
    }

    fn check_quota(&self) -> Result<(), ProviderError> {
        if self.quota_exhausted.load(Ordering::SeqCst) {
            Err(ProviderError::QuotaExceeded {
                provider: "TWELVE_DATA",
                message: "API quota exceeded.".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn bars() -> Vec<DailyBar> {
        (0..7)
            .map(|i| DailyBar {
                datetime: format!("2024-01-{:02}", 15 - i),
                open: dec!(185.00),
                high: dec!(186.40),
                low: dec!(183.92),
                close: dec!(185.92),
                volume: Some(dec!(65076600)),
            })
            .collect()
    }
}

#[async_trait]
impl QuoteProvider for FakeMarket {
    async fn quote(&self, symbol: &str) -> Result<Value, ProviderError> {
        self.check_quota()?;
        if self.known.contains(&symbol.to_uppercase()) {
            Ok(json!({"symbol": symbol.to_uppercase(), "close": "185.92"}))
        } else {
            Err(ProviderError::SymbolNotFound {
                provider: "TWELVE_DATA",
                symbol: symbol.to_string(),
            })
        }
    }

    async fn time_series(&self, symbol: &str, _days: usize) -> Result<Vec<DailyBar>, ProviderError> {
        self.check_quota()?;
        if self.chartable.contains(&symbol.to_uppercase()) {
            Ok(Self::bars())
        } else {
            Err(ProviderError::SymbolNotFound {
                provider: "TWELVE_DATA",
                symbol: symbol.to_string(),
            })
        }
    }
}

#[async_trait]
impl OverviewProvider for FakeMarket {
    async fn overview(&self, symbol: &str) -> Result<Value, ProviderError> {
        self.check_quota()?;
        if self.known.contains(&symbol.to_uppercase()) {
            Ok(json!({"Symbol": symbol.to_uppercase(), "Name": "Fake Corp"}))
        } else {
            Err(ProviderError::SymbolNotFound {
                provider: "ALPHA_VANTAGE",
                symbol: symbol.to_string(),
            })
        }
    }
}

fn app(market: Arc<FakeMarket>) -> Router {
    let service = Arc::new(CompanyService::new(
        Arc::new(InMemoryStore::new()),
        market.clone() as Arc<dyn QuoteProvider>,
        market as Arc<dyn OverviewProvider>,
    ));
    create_router(service, TOKEN.to_string())
}

fn default_app() -> Router {
    app(FakeMarket::new(
        &["AAPL", "MSFT", "GOOG", "AMZN", "NVDA", "GHOST"],
        &["AAPL", "MSFT", "GOOG", "AMZN", "NVDA"],
    ))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create(app: &Router, symbol: &str, name: &str) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            "POST",
            "/companies",
            json!({"symbol": symbol, "name": name, "description": "Test company"}),
        ),
    )
    .await
}

// ---------------------------------------------------------------------------
// Auth gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_reachable_without_a_token() {
    let app = default_app();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn requests_without_a_token_are_rejected() {
    let app = default_app();
    let request = Request::builder()
        .uri("/companies")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Unauthorized: Invalid token");
}

#[tokio::test]
async fn a_wrong_token_is_rejected() {
    let app = default_app();
    let request = Request::builder()
        .uri("/companies")
        .header("authorization", "Bearer nope")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn validate_token_confirms_a_good_token() {
    let app = default_app();
    let (status, body) = send(&app, get("/validate-token")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Token is valid.");
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_stores_the_symbol_uppercased() {
    let app = default_app();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/companies",
            json!({"symbol": "aapl", "name": "Apple", "description": "Tech"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["name"], "Apple");

    let (_, listing) = send(&app, get("/companies")).await;
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["results"][0]["symbol"], "AAPL");
}

#[tokio::test]
async fn duplicate_symbols_differing_only_in_case_are_rejected() {
    let app = default_app();
    let (status, _) = create(&app, "AAPL", "Apple").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create(&app, "aApL", "Apple Again").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "duplicated");

    let (_, listing) = send(&app, get("/companies")).await;
    assert_eq!(listing["count"], 1);
}

#[tokio::test]
async fn an_unknown_symbol_creates_no_record() {
    let app = default_app();
    let (status, body) = create(&app, "LOL", "Laughs Inc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "The symbol 'LOL' is not valid.");

    let (_, listing) = send(&app, get("/companies")).await;
    assert_eq!(listing["count"], 0);
}

#[tokio::test]
async fn a_missing_symbol_is_a_validation_error() {
    let app = default_app();
    let (status, body) = send(
        &app,
        json_request("POST", "/companies", json!({"name": "No Symbol Inc"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Symbol is required.");
}

#[tokio::test]
async fn quota_exhaustion_fails_distinctly_and_a_retry_succeeds() {
    let market = FakeMarket::new(&["AAPL"], &["AAPL"]);
    let app = app(market.clone());

    market.set_quota_exhausted(true);
    let (status, body) = create(&app, "AAPL", "Apple").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["detail"].as_str().unwrap().contains("unavailable"));

    let (_, listing) = send(&app, get("/companies")).await;
    assert_eq!(listing["count"], 0);

    // After quota recovery the same create goes through
    market.set_quota_exhausted(false);
    let (status, _) = create(&app, "AAPL", "Apple").await;
    assert_eq!(status, StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// List, search, pagination
// ---------------------------------------------------------------------------

async fn seeded_app() -> Router {
    let app = default_app();
    for (symbol, name) in [
        ("AAPL", "Apple"),
        ("MSFT", "Microsoft"),
        ("GOOG", "Alphabet"),
        ("AMZN", "Amazon"),
        ("NVDA", "Nvidia"),
    ] {
        let (status, _) = create(&app, symbol, name).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    app
}

#[tokio::test]
async fn five_records_with_per_page_two_make_three_pages() {
    let app = seeded_app().await;

    for (page, expected) in [(1, 2), (2, 2), (3, 1)] {
        let (status, body) = send(&app, get(&format!("/companies?per_page=2&page={page}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 5);
        assert_eq!(body["total_pages"], 3);
        assert_eq!(body["results"].as_array().unwrap().len(), expected);
    }
}

#[tokio::test]
async fn a_page_beyond_the_range_is_empty_with_an_accurate_count() {
    let app = seeded_app().await;
    let (status, body) = send(&app, get("/companies?per_page=2&page=10")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn by_symbol_search_matches_exactly_one_record() {
    let app = seeded_app().await;
    let (status, body) = send(
        &app,
        get("/companies?search_field=by_symbol&search=aapl"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["symbol"], "AAPL");
}

#[tokio::test]
async fn invalid_sort_parameters_fall_back_to_name_ascending() {
    let app = seeded_app().await;
    let (status, body) = send(
        &app,
        get("/companies?sort_by=market_cap&sort_direction=sideways"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Alphabet", "Amazon", "Apple", "Microsoft", "Nvidia"]);
}

// ---------------------------------------------------------------------------
// Detail, update, delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn detail_with_the_market_flag_attaches_seven_bars() {
    let app = default_app();
    let (_, created) = create(&app, "AAPL", "Apple").await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get(&format!("/companies/{id}?market"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["market_data"].as_array().unwrap().len(), 7);

    // Without the flag the field is omitted entirely
    let (_, body) = send(&app, get(&format!("/companies/{id}"))).await;
    assert!(body.get("market_data").is_none());
}

#[tokio::test]
async fn a_record_whose_market_symbol_vanished_reads_as_not_found() {
    // GHOST passes quote validation but has no time series
    let app = default_app();
    let (status, created) = create(&app, "GHOST", "Ghost Corp").await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, get(&format!("/companies/{id}"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get(&format!("/companies/{id}?market"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Symbol 'GHOST' not found.");
}

#[tokio::test]
async fn reading_an_unknown_id_is_not_found() {
    let app = default_app();
    let (status, body) = send(
        &app,
        get("/companies/00000000-0000-0000-0000-000000000000"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Company not found.");
}

#[tokio::test]
async fn update_merges_partial_fields_and_reuppercases_the_symbol() {
    let app = default_app();
    let (_, created) = create(&app, "AAPL", "Apple").await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        json_request("PUT", &format!("/companies/{id}"), json!({"name": "Apple Inc"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Apple Inc");
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["description"], "Test company");

    // The provider is never consulted on update, so even a symbol it
    // would reject goes through, uppercased.
    let (status, body) = send(
        &app,
        json_request("PUT", &format!("/companies/{id}"), json!({"symbol": "zzzz"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "ZZZZ");
}

#[tokio::test]
async fn update_rejects_a_symbol_held_by_another_record() {
    let app = default_app();
    create(&app, "AAPL", "Apple").await;
    let (_, other) = create(&app, "MSFT", "Microsoft").await;
    let id = other["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        json_request("PUT", &format!("/companies/{id}"), json!({"symbol": "aapl"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "duplicated");
}

#[tokio::test]
async fn delete_removes_the_record_and_repeats_as_not_found() {
    let app = default_app();
    let (_, created) = create(&app, "AAPL", "Apple").await;
    let id = created["id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/companies/{id}"))
        .header("authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/companies/{id}"))
        .header("authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get(&format!("/companies/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// External lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn external_lookup_returns_the_raw_quote_payload() {
    let app = default_app();
    let (status, body) = send(&app, get("/companies/external/AAPL")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "AAPL");
}

#[tokio::test]
async fn external_lookup_can_route_to_the_overview_provider() {
    let app = default_app();
    let (status, body) = send(&app, get("/companies/external/AAPL?source=overview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Symbol"], "AAPL");
}

#[tokio::test]
async fn external_lookup_of_an_unknown_symbol_is_not_found() {
    let app = default_app();
    let (status, body) = send(&app, get("/companies/external/LOL")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Symbol 'LOL' not found.");
}
