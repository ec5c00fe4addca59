//! HTTP route handlers

pub mod auth;
pub mod products;

use crate::error::ApiError;
use axum::Json;
use axum::extract::Path;
use axum::extract::rejection::{JsonRejection, PathRejection};

/// Unwrap a JSON body, turning malformed input into a 422
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

/// Unwrap a numeric path id; anything unparsable names no resource, so 404
pub(crate) fn path_id(id: Result<Path<u64>, PathRejection>) -> Result<u64, ApiError> {
    id.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Unparsable resource id");
        ApiError::NotFound("Resource not found".to_string())
    })
}
