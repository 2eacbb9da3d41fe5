use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::registry::{CompanyService, LookupSource, QuerySpec, RegistryError};

use super::responses::*;

/// Shared application state
pub type AppState = Arc<CompanyService>;

/// Convert RegistryError to HTTP response
///
/// Duplicates answer 400 with an `"error": "duplicated"` marker rather
/// than 409; existing clients key off that body field.
impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = match &self {
            RegistryError::MissingSymbol
            | RegistryError::Validation(_)
            | RegistryError::DuplicateSymbol(_)
            | RegistryError::InvalidSymbol(_) => StatusCode::BAD_REQUEST,
            RegistryError::NotFound | RegistryError::SymbolUnknown(_) => StatusCode::NOT_FOUND,
            RegistryError::UpstreamUnavailable(_) | RegistryError::Storage(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        let error = match &self {
            RegistryError::DuplicateSymbol(_) => Some("duplicated".to_string()),
            _ => None,
        };

        let body = Json(ErrorResponse {
            detail: self.to_string(),
            error,
        });

        (status, body).into_response()
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

/// Validate the provided token
///
/// Reaching this handler proves the bearer gate accepted the request.
#[utoipa::path(
    get,
    path = "/validate-token",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn validate_token() -> impl IntoResponse {
    Json(serde_json::json!({ "detail": "Token is valid." }))
}

/// List or search companies
#[utoipa::path(
    get,
    path = "/companies",
    tag = "Companies",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of companies", body = CompanyListResponse)
    )
)]
pub async fn list_companies(
    State(service): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<CompanyListResponse>, RegistryError> {
    let spec = QuerySpec::from_params(
        params.search_field.as_deref(),
        params.search,
        params.sort_by.as_deref(),
        params.sort_direction.as_deref(),
        params.per_page,
        params.page,
    );

    let page = service.list(&spec).await?;
    Ok(Json(page.into()))
}

/// Create a new company
///
/// The symbol is validated against the quote provider before anything is
/// persisted and is stored uppercase.
#[utoipa::path(
    post,
    path = "/companies",
    tag = "Companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = CompanyResponse),
        (status = 400, description = "Missing/invalid field, unknown symbol, or duplicate", body = ErrorResponse),
        (status = 503, description = "Provider quota exhausted or unreachable", body = ErrorResponse)
    )
)]
pub async fn create_company(
    State(service): State<AppState>,
    Json(request): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), RegistryError> {
    let company = service.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(company.into())))
}

/// Retrieve company details
///
/// Adding the `market` query flag attaches the last seven daily bars from
/// the time-series provider.
#[utoipa::path(
    get,
    path = "/companies/{id}",
    tag = "Companies",
    params(
        ("id" = Uuid, Path, description = "Company ID"),
        DetailQuery
    ),
    responses(
        (status = 200, description = "Company details", body = CompanyDetailResponse),
        (status = 404, description = "Company or market-data symbol not found", body = ErrorResponse),
        (status = 503, description = "Provider quota exhausted or unreachable", body = ErrorResponse)
    )
)]
pub async fn get_company(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<DetailQuery>,
) -> Result<Json<CompanyDetailResponse>, RegistryError> {
    let record = service.get(id, params.market.is_some()).await?;
    Ok(Json(record.into()))
}

/// Update a company
#[utoipa::path(
    put,
    path = "/companies/{id}",
    tag = "Companies",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Company updated", body = CompanyResponse),
        (status = 400, description = "Invalid field or symbol collision", body = ErrorResponse),
        (status = 404, description = "Company not found", body = ErrorResponse)
    )
)]
pub async fn update_company(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCompanyRequest>,
) -> Result<Json<CompanyResponse>, RegistryError> {
    let company = service.update(id, request.into()).await?;
    Ok(Json(company.into()))
}

/// Delete a company
#[utoipa::path(
    delete,
    path = "/companies/{id}",
    tag = "Companies",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Company not found", body = ErrorResponse)
    )
)]
pub async fn delete_company(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, RegistryError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get external company info by symbol
///
/// Fetches the raw provider payload without touching the collection.
#[utoipa::path(
    get,
    path = "/companies/external/{symbol}",
    tag = "External",
    params(
        ("symbol" = String, Path, description = "Ticker symbol (e.g. AAPL)"),
        ExternalQuery
    ),
    responses(
        (status = 200, description = "Raw provider payload"),
        (status = 404, description = "Symbol not found upstream", body = ErrorResponse),
        (status = 503, description = "Provider quota exhausted or unreachable", body = ErrorResponse)
    )
)]
pub async fn external_company(
    State(service): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<ExternalQuery>,
) -> Result<Json<serde_json::Value>, RegistryError> {
    let source = LookupSource::parse(params.source.as_deref());
    let payload = service.external_lookup(&symbol, source).await?;
    Ok(Json(payload))
}
