//! Product catalogue storage

use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::RwLock;

const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProductError {
    #[error("Product {0} not found")]
    NotFound(u64),

    #[error("{0}")]
    Validation(String),
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ProductError::Validation(msg) => ApiError::Validation(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /products`
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
}

/// Body of `PUT`/`PATCH /products/:id`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<u32>,
}

fn validate_name(name: &str) -> Result<String, ProductError> {
    let name = name.trim();
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(ProductError::Validation(
            "The name field is required and may not exceed 255 characters.".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn validate_price(price: f64) -> Result<f64, ProductError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ProductError::Validation(
            "The price must be a non-negative number.".to_string(),
        ));
    }
    Ok(price)
}

#[derive(Default)]
struct Catalogue {
    next_id: u64,
    products: BTreeMap<u64, Product>,
}

/// In-memory product store; ids are assigned sequentially from 1
#[derive(Default)]
pub struct ProductStore {
    inner: RwLock<Catalogue>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All products ordered by id
    pub async fn list(&self) -> Vec<Product> {
        self.inner.read().await.products.values().cloned().collect()
    }

    pub async fn get(&self, id: u64) -> Result<Product, ProductError> {
        self.inner
            .read()
            .await
            .products
            .get(&id)
            .cloned()
            .ok_or(ProductError::NotFound(id))
    }

    pub async fn create(&self, input: NewProduct) -> Result<Product, ProductError> {
        let name = validate_name(&input.name)?;
        let price = validate_price(input.price)?;

        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let now = Utc::now();
        let product = Product {
            id: inner.next_id,
            name,
            description: input.description,
            price,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    pub async fn update(&self, id: u64, changes: ProductUpdate) -> Result<Product, ProductError> {
        let name = changes.name.as_deref().map(validate_name).transpose()?;
        let price = changes.price.map(validate_price).transpose()?;

        let mut inner = self.inner.write().await;
        let product = inner
            .products
            .get_mut(&id)
            .ok_or(ProductError::NotFound(id))?;

        if let Some(name) = name {
            product.name = name;
        }
        if let Some(description) = changes.description {
            product.description = Some(description);
        }
        if let Some(price) = price {
            product.price = price;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    pub async fn delete(&self, id: u64) -> Result<Product, ProductError> {
        self.inner
            .write()
            .await
            .products
            .remove(&id)
            .ok_or(ProductError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            description: None,
            price: 9.99,
            stock: 3,
        }
    }

    #[tokio::test]
    async fn create_get_delete() {
        let store = ProductStore::new();
        let created = store.create(widget()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(store.get(1).await.unwrap().name, "Widget");

        store.delete(1).await.unwrap();
        assert_eq!(store.get(1).await.unwrap_err(), ProductError::NotFound(1));
    }

    #[tokio::test]
    async fn ids_are_not_reused() {
        let store = ProductStore::new();
        store.create(widget()).await.unwrap();
        store.delete(1).await.unwrap();
        assert_eq!(store.create(widget()).await.unwrap().id, 2);
    }

    #[tokio::test]
    async fn partial_update() {
        let store = ProductStore::new();
        store.create(widget()).await.unwrap();

        let updated = store
            .update(
                1,
                ProductUpdate {
                    stock: Some(10),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.stock, 10);
        assert_eq!(updated.name, "Widget");
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn invalid_price_rejected() {
        let store = ProductStore::new();
        for price in [-1.0, f64::NAN, f64::INFINITY] {
            let mut input = widget();
            input.price = price;
            assert!(matches!(
                store.create(input).await,
                Err(ProductError::Validation(_))
            ));
        }
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn update_missing_product() {
        let store = ProductStore::new();
        let err = store.update(7, ProductUpdate::default()).await.unwrap_err();
        assert_eq!(err, ProductError::NotFound(7));
    }
}
