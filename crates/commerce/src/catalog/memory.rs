//! In-memory catalog for tests and embedded use.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use cartwheel_core::ProductId;

use super::{Catalog, Product};
use crate::error::Result;

/// In-memory catalog backed by a `HashMap`.
///
/// Batched lookups come back in hash order, which deliberately mirrors the
/// "no ordering guarantee" contract of the real backends.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product record.
    pub fn insert(&self, product: Product) {
        let mut products = self
            .products
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        products.insert(product.id, product);
    }

    /// Remove a product record, simulating a product vanishing mid-session.
    pub fn remove(&self, id: ProductId) {
        let mut products = self
            .products
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        products.remove(&id);
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn product(&self, id: ProductId) -> Result<Option<Product>> {
        let products = self
            .products
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(products.get(&id).cloned())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        let wanted: HashSet<ProductId> = ids.iter().copied().collect();
        let products = self
            .products
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(products
            .values()
            .filter(|p| wanted.contains(&p.id))
            .cloned()
            .collect())
    }
}
