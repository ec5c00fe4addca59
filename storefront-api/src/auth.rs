//! Bearer token authentication
//!
//! [`auth_middleware`] resolves the `Authorization: Bearer <token>` header
//! through the identity provider and injects an [`AuthContext`] plus the
//! caller's [`Principal`] into request extensions. Handlers extract them via
//! [`CurrentUser`] and [`BearerToken`].

use crate::error::ApiError;
use crate::identity::User;
use crate::state::ApiState;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Authenticated caller, stored in request extensions
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
    pub token: String,
}

/// Pull the token out of an `Authorization` header value
pub fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

pub async fn auth_middleware(
    State(state): State<ApiState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match header_value {
        Some(value) => match parse_bearer(value) {
            Some(token) => token.to_string(),
            None => {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                return ApiError::Unauthenticated("Unauthenticated.".into()).into_response();
            }
        },
        None => {
            tracing::debug!("authentication failed: missing authorization header");
            return ApiError::Unauthenticated("Unauthenticated.".into()).into_response();
        }
    };

    match state.identity.authenticate(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(user.principal());
            request.extensions_mut().insert(AuthContext { user, token });
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(reason = %e, "authentication failed: token rejected");
            ApiError::from(e).into_response()
        }
    }
}

/// The authenticated user
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// The bearer token the request was authenticated with
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

fn auth_context(parts: &Parts) -> Result<&AuthContext, ApiError> {
    parts
        .extensions
        .get::<AuthContext>()
        .ok_or_else(|| ApiError::Unauthenticated("Unauthenticated.".into()))
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        auth_context(parts).map(|ctx| CurrentUser(ctx.user.clone()))
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        auth_context(parts).map(|ctx| BearerToken(ctx.token.clone()))
    }
}
