//! Bearer-token auth gate
//!
//! Every request is checked against a single configured access token
//! before it reaches any handler, except for the documentation and
//! health paths on the allow-list.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::responses::ErrorResponse;

/// Paths (by prefix) that bypass the token check
const ALLOW_LIST: &[&str] = &["/swagger-ui", "/api-docs", "/health"];

/// Configured gate state, injected at startup
pub struct AuthGate {
    access_token: String,
}

impl AuthGate {
    pub fn new(access_token: String) -> Self {
        Self { access_token }
    }

    /// Whether the path may pass without a token.
    fn permits(&self, path: &str) -> bool {
        ALLOW_LIST.iter().any(|prefix| path.starts_with(prefix))
    }

    /// Whether the Authorization header carries exactly the expected token.
    fn token_matches(&self, header: Option<&str>) -> bool {
        header == Some(format!("Bearer {}", self.access_token).as_str())
    }
}

/// Rejection emitted by the gate
#[derive(Debug)]
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            detail: "Unauthorized: Invalid token".to_string(),
            error: None,
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Middleware rejecting requests without the configured bearer token.
pub async fn require_bearer(
    State(gate): State<Arc<AuthGate>>,
    request: Request,
    next: Next,
) -> Result<Response, Unauthorized> {
    if gate.permits(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if !gate.token_matches(header) {
        return Err(Unauthorized);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list_covers_docs_and_health() {
        let gate = AuthGate::new("sekret".to_string());
        assert!(gate.permits("/swagger-ui"));
        assert!(gate.permits("/swagger-ui/index.html"));
        assert!(gate.permits("/api-docs/openapi.json"));
        assert!(gate.permits("/health"));
        assert!(!gate.permits("/companies"));
        assert!(!gate.permits("/validate-token"));
    }

    #[test]
    fn test_token_matching_is_exact() {
        let gate = AuthGate::new("sekret".to_string());
        assert!(gate.token_matches(Some("Bearer sekret")));
        assert!(!gate.token_matches(Some("Bearer wrong")));
        assert!(!gate.token_matches(Some("bearer sekret")));
        assert!(!gate.token_matches(Some("sekret")));
        assert!(!gate.token_matches(None));
    }
}
