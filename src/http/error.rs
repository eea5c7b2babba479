//! Request-level error type and the JSON error envelope.
//!
//! Every failure surfaces to the browser as `{ok:false, error:"..."}` with
//! a status code from the fixed mapping below. Upstream userErrors are
//! passed through verbatim.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::shopify::StoreError;

/// Errors a proxy handler can produce.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// A required request field is absent or empty.
    #[error("Missing required fields: {0}")]
    MissingField(&'static str),

    /// The request body is not valid JSON for the expected shape.
    #[error("Invalid JSON")]
    InvalidJson,

    /// The request Origin is not on the allow-list.
    #[error("Origin not allowed")]
    OriginNotAllowed,

    /// The supplied email does not match the platform's customer record.
    #[error("Customer verification failed")]
    VerificationFailed,

    /// Reading from the upstream store failed.
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(StoreError),

    /// Writing to the upstream store failed.
    #[error("{0}")]
    UpstreamWrite(StoreError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingField(_) | ProxyError::InvalidJson => StatusCode::BAD_REQUEST,
            ProxyError::OriginNotAllowed | ProxyError::VerificationFailed => {
                StatusCode::UNAUTHORIZED
            }
            ProxyError::UpstreamFetch(_) => StatusCode::BAD_GATEWAY,
            // Field-level rejections from the write are client-visible 500s;
            // transport failures on the write path are gateway errors.
            ProxyError::UpstreamWrite(StoreError::UserErrors(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::UpstreamWrite(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// The `{ok:false, error}` envelope.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: message.into(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = %status, error = %self, "Request failed");
        (status, Json(ErrorEnvelope::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ProxyError::MissingField("shop").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::VerificationFailed.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ProxyError::OriginNotAllowed.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ProxyError::UpstreamFetch(StoreError::GraphQl("boom".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ProxyError::UpstreamWrite(StoreError::UserErrors("bad field".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn user_errors_surface_verbatim() {
        let err = ProxyError::UpstreamWrite(StoreError::UserErrors("value too long".into()));
        assert_eq!(err.to_string(), "value too long");
    }
}
