//! Origin allow-list middleware.
//!
//! Guards the browser-facing mutation routes: only configured storefront
//! origins may call them. Handles the `OPTIONS` preflight inline and stamps
//! CORS headers on every response that passes through.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::{extract::State, Json};
use std::collections::HashSet;
use std::sync::Arc;

use crate::http::error::ErrorEnvelope;

/// State required for the origin gate.
#[derive(Clone)]
pub struct CorsState {
    pub allowed_origins: Arc<HashSet<String>>,
}

impl CorsState {
    pub fn new(origins: &[String]) -> Self {
        Self {
            allowed_origins: Arc::new(origins.iter().cloned().collect()),
        }
    }
}

pub async fn origin_gate(
    State(state): State<CorsState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let allowed = state.allowed_origins.contains(&origin);

    if req.method() == Method::OPTIONS {
        let mut response = if allowed {
            StatusCode::NO_CONTENT.into_response()
        } else {
            tracing::warn!(origin = %origin, "Preflight from disallowed origin");
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorEnvelope::new("Origin not allowed (preflight)")),
            )
                .into_response()
        };
        apply_cors_headers(response.headers_mut(), &origin);
        return response;
    }

    if !allowed {
        tracing::warn!(origin = %origin, "Request from disallowed origin");
        let mut response = (
            StatusCode::UNAUTHORIZED,
            Json(ErrorEnvelope::new("Origin not allowed")),
        )
            .into_response();
        apply_cors_headers(response.headers_mut(), &origin);
        return response;
    }

    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut(), &origin);
    response
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: &str) {
    let origin_value = HeaderValue::from_str(origin)
        .ok()
        .filter(|_| !origin.is_empty())
        .unwrap_or(HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin_value);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
}
