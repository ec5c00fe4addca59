//! # API Error Types
//!
//! Every failure leaving the REST surface is an [`ApiError`], rendered as
//!
//! ```json
//! {"error": {"code": "FORBIDDEN", "message": "...", "required_roles": ["admin"]}}
//! ```
//!
//! Internal details are logged, never returned.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use storefront_rbac::error::GateError;
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    pub message: String,
    /// Roles that would have been accepted; only on 403.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_roles: Option<Vec<String>>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, invalid or expired credentials (401).
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated but lacking every acceptable role (403).
    #[error("{message}")]
    Forbidden {
        message: String,
        required_roles: Vec<String>,
    },

    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Conflict with current state, e.g. email already registered (409).
    #[error("{0}")]
    Conflict(String),

    /// Request validation failed (422).
    #[error("{0}")]
    Validation(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            Self::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let required_roles = match self {
            Self::Forbidden { required_roles, .. } => Some(required_roles),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                required_roles,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Unauthenticated => Self::Unauthenticated(err.to_string()),
            GateError::Unauthorized { ref required } => Self::Forbidden {
                required_roles: required.clone(),
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn status_codes() {
        let cases = [
            (ApiError::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_and_code().0, status);
        }
    }

    #[test]
    fn gate_errors_convert() {
        let err: ApiError = GateError::Unauthenticated.into();
        assert_eq!(err.status_and_code(), (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"));

        let err: ApiError = GateError::Unauthorized {
            required: vec!["admin".to_string()],
        }
        .into();
        assert_eq!(err.status_and_code(), (StatusCode::FORBIDDEN, "FORBIDDEN"));
        assert_eq!(err.to_string(), "Unauthorized. Required roles: admin");
    }

    #[tokio::test]
    async fn forbidden_body_lists_roles() {
        let response = ApiError::Forbidden {
            message: "Unauthorized. Required roles: admin, editor".into(),
            required_roles: vec!["admin".into(), "editor".into()],
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "FORBIDDEN");
        assert_eq!(body["error"]["required_roles"], serde_json::json!(["admin", "editor"]));
    }

    #[tokio::test]
    async fn internal_message_hidden() {
        let response = ApiError::Internal("lock poisoned".into()).into_response();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["message"], "An internal error occurred");
        assert!(body["error"].get("required_roles").is_none());
    }
}
