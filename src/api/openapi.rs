use utoipa::OpenApi;

use crate::api::handlers;
use crate::api::responses::*;
use crate::models::Company;
use crate::providers::DailyBar;

/// OpenAPI specification
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Company Registry API",
        version = "1.0.0",
        description = "A record-management API for companies, with symbol validation and market data from external financial-data providers",
        license(
            name = "MIT"
        )
    ),
    paths(
        handlers::health_check,
        handlers::validate_token,
        handlers::list_companies,
        handlers::create_company,
        handlers::get_company,
        handlers::update_company,
        handlers::delete_company,
        handlers::external_company,
    ),
    components(
        schemas(
            Company,
            CreateCompanyRequest,
            UpdateCompanyRequest,
            CompanyResponse,
            CompanyDetailResponse,
            CompanyListResponse,
            DailyBar,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Token validation endpoints"),
        (name = "Companies", description = "Company record management endpoints"),
        (name = "External", description = "External provider lookup endpoints"),
    )
)]
pub struct ApiDoc;
