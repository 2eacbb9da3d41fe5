use axum::{
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::registry::CompanyService;

use super::auth::{require_bearer, AuthGate};
use super::handlers::*;
use super::openapi::ApiDoc;

/// Create the API router with Swagger UI and the bearer-token gate
///
/// The gate layer wraps every route; the docs and health paths pass
/// through via its allow-list.
pub fn create_router(service: Arc<CompanyService>, access_token: String) -> Router {
    let gate = Arc::new(AuthGate::new(access_token));

    Router::new()
        // Swagger UI (allow-listed)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Health endpoint (allow-listed)
        .route("/health", get(health_check))
        // Token validation
        .route("/validate-token", get(validate_token))
        // Company collection endpoints
        .route("/companies", get(list_companies).post(create_company))
        // External provider lookup (static segment, so it never shadows :id)
        .route("/companies/external/:symbol", get(external_company))
        // Company record endpoints
        .route(
            "/companies/:id",
            get(get_company).put(update_company).delete(delete_company),
        )
        .layer(middleware::from_fn_with_state(gate, require_bearer))
        .with_state(service)
}
