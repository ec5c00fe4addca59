//! # Storefront API
//!
//! REST surface for the Storefront catalogue.
//!
//! | route                         | access                                  |
//! |-------------------------------|-----------------------------------------|
//! | `POST /register`, `POST /login` | public                                |
//! | `GET /user`, `POST /logout`   | bearer token                            |
//! | `GET /products[/:id]`         | bearer token                            |
//! | `POST /products`, `PUT\|PATCH\|DELETE /products/:id` | bearer token + `products.manage` gate |
//!
//! The role requirement for each gated group comes from a
//! [`GateRegistry`]; building the router fails if a group it needs is not
//! registered.

pub mod auth;
pub mod error;
pub mod gate;
pub mod identity;
pub mod products;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::ApiState;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use storefront_rbac::config::{GateConfig, GateRegistry, RouteGroupConfig};
use storefront_rbac::error::RbacError;
use storefront_rbac::requirement::RoleRequirement;
use tower_http::trace::TraceLayer;

/// Route group guarding product writes
pub const PRODUCTS_MANAGE: &str = "products.manage";

/// Route groups the router needs, with their out-of-the-box roles
pub fn default_gate_config() -> GateConfig {
    GateConfig::default().with_group(
        RouteGroupConfig::new(PRODUCTS_MANAGE, RoleRequirement::any_of(["admin"]))
            .with_description("Create, update and delete products"),
    )
}

/// Build the REST router
pub fn router(state: ApiState) -> Result<Router, RbacError> {
    let manage = from_fn_with_state(state.gates.gate(PRODUCTS_MANAGE)?.clone(), gate::require_roles);

    let authenticated = Router::new()
        .route("/user", get(routes::auth::user))
        .route("/logout", post(routes::auth::logout))
        .route(
            "/products",
            get(routes::products::index)
                .merge(post(routes::products::store).route_layer(manage.clone())),
        )
        .route(
            "/products/:id",
            get(routes::products::show).merge(
                put(routes::products::update)
                    .patch(routes::products::update)
                    .delete(routes::products::destroy)
                    .route_layer(manage),
            ),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::auth_middleware));

    Ok(Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .merge(authenticated)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
