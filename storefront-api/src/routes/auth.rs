//! `/register`, `/login`, `/user`, `/logout`

use super::json_body;
use crate::auth::{BearerToken, CurrentUser};
use crate::error::ApiError;
use crate::identity::{AccessToken, Registration, User};
use crate::state::ApiState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(flatten)]
    pub token: AccessToken,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<ApiState>,
    payload: Result<Json<Registration>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let registration = json_body(payload)?;
    let (user, token) = state.identity.register(registration).await?;
    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

pub async fn login(
    State(state): State<ApiState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let request = json_body(payload)?;
    let (user, token) = state.identity.login(&request.email, &request.password).await?;
    Ok(Json(AuthResponse { user, token }))
}

pub async fn user(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

pub async fn logout(
    State(state): State<ApiState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, ApiError> {
    state.identity.revoke(&token).await?;
    Ok(Json(json!({"message": "Successfully logged out"})))
}
