//! Role gate as axum middleware
//!
//! Mount with `from_fn_with_state(gate, require_roles)` after the
//! authentication layer has run. The gate reads the [`Principal`] from
//! request extensions; a missing principal is a 401.

use crate::error::ApiError;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use storefront_rbac::gate::RoleGate;
use storefront_rbac::principal::Principal;

pub async fn require_roles(State(gate): State<RoleGate>, request: Request, next: Next) -> Response {
    let principal = request.extensions().get::<Principal>();

    match gate.check(principal) {
        Ok(()) => next.run(request).await,
        Err(e) => ApiError::from(e).into_response(),
    }
}
