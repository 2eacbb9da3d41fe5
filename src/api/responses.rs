use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::Company;
use crate::providers::DailyBar;
use crate::registry::{CompanyInput, CompanyRecord, Page};

/// Request to create a new company
///
/// Every field is optional at the wire level; the record service owns the
/// presence checks so a missing symbol yields the documented 400 body
/// instead of a deserialization error.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCompanyRequest {
    /// Company name (max 50 characters)
    pub name: Option<String>,
    /// Free-form description (max 100 characters)
    pub description: Option<String>,
    /// Ticker symbol, validated against the quote provider and stored uppercase
    pub symbol: Option<String>,
}

/// Partial update to a company; absent fields are left untouched
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub symbol: Option<String>,
}

impl From<CreateCompanyRequest> for CompanyInput {
    fn from(request: CreateCompanyRequest) -> Self {
        CompanyInput {
            name: request.name,
            description: request.description,
            symbol: request.symbol,
        }
    }
}

impl From<UpdateCompanyRequest> for CompanyInput {
    fn from(request: UpdateCompanyRequest) -> Self {
        CompanyInput {
            name: request.name,
            description: request.description,
            symbol: request.symbol,
        }
    }
}

/// One company record
#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub symbol: String,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            description: company.description,
            symbol: company.symbol,
        }
    }
}

/// Company detail, optionally carrying the last seven daily bars
#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyDetailResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_data: Option<Vec<DailyBar>>,
}

impl From<CompanyRecord> for CompanyDetailResponse {
    fn from(record: CompanyRecord) -> Self {
        Self {
            id: record.company.id,
            name: record.company.name,
            description: record.company.description,
            symbol: record.company.symbol,
            market_data: record.market_data,
        }
    }
}

/// One page of companies plus pagination metadata
#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyListResponse {
    /// Total number of matching records across all pages
    pub count: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub results: Vec<CompanyResponse>,
}

impl From<Page> for CompanyListResponse {
    fn from(page: Page) -> Self {
        Self {
            count: page.count,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
            results: page.results.into_iter().map(Into::into).collect(),
        }
    }
}

/// Query parameters accepted by the list endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// One of in_all, in_name, in_symbol, in_description, by_symbol
    pub search_field: Option<String>,
    /// Search term
    pub search: Option<String>,
    /// One of name, symbol (default name)
    pub sort_by: Option<String>,
    /// One of asc, desc (default asc)
    pub sort_direction: Option<String>,
    /// Page size (default 9, max 45)
    pub per_page: Option<usize>,
    /// 1-indexed page number
    pub page: Option<usize>,
}

/// Query parameters accepted by the detail endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct DetailQuery {
    /// Presence of this flag attaches market data to the response
    pub market: Option<String>,
}

/// Query parameters accepted by the external lookup endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct ExternalQuery {
    /// One of quote (default), overview
    pub source: Option<String>,
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable reason
    pub detail: String,
    /// Machine-readable marker for specific failures (e.g. "duplicated")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
