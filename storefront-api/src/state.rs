//! Shared application state

use crate::identity::{IdentityProvider, InMemoryIdentityProvider};
use crate::products::ProductStore;
use std::sync::Arc;
use storefront_core::config::AppConfig;
use storefront_rbac::config::GateRegistry;

/// Everything the route handlers share
#[derive(Clone)]
pub struct ApiState {
    pub identity: Arc<dyn IdentityProvider>,
    pub products: Arc<ProductStore>,
    pub gates: Arc<GateRegistry>,
}

impl ApiState {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        products: Arc<ProductStore>,
        gates: Arc<GateRegistry>,
    ) -> Self {
        Self {
            identity,
            products,
            gates,
        }
    }

    /// State backed by the in-memory identity provider and product store
    pub fn in_memory(config: &AppConfig, gates: GateRegistry) -> Self {
        Self::new(
            Arc::new(InMemoryIdentityProvider::from_settings(&config.auth)),
            Arc::new(ProductStore::new()),
            Arc::new(gates),
        )
    }
}
