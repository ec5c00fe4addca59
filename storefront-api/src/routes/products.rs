//! `/products` CRUD

use super::{json_body, path_id};
use crate::error::ApiError;
use crate::products::{NewProduct, Product, ProductUpdate};
use crate::state::ApiState;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;

pub async fn index(State(state): State<ApiState>) -> Json<Vec<Product>> {
    Json(state.products.list().await)
}

pub async fn show(
    State(state): State<ApiState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = path_id(id)?;
    Ok(Json(state.products.get(id).await?))
}

pub async fn store(
    State(state): State<ApiState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.products.create(json_body(payload)?).await?;
    tracing::info!(product_id = product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<ApiState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = path_id(id)?;
    let product = state.products.update(id, json_body(payload)?).await?;
    tracing::info!(product_id = id, "Product updated");
    Ok(Json(product))
}

pub async fn destroy(
    State(state): State<ApiState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(id)?;
    state.products.delete(id).await?;
    tracing::info!(product_id = id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
