//! Product catalog abstraction.
//!
//! The catalog is a read-only collaborator: the cart and recommender only ever
//! resolve product records by ID, one batched query at a time. Batched lookups
//! make no ordering guarantee; callers that care about order (the recommender
//! does) re-sort the results themselves.

mod memory;

#[cfg(feature = "postgres")]
mod pg;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwheel_core::ProductId;

use crate::error::Result;

pub use memory::InMemoryCatalog;

#[cfg(feature = "postgres")]
pub use pg::{PgCatalog, create_pool};

/// A catalog product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// URL-safe identifier used in product links.
    pub slug: String,
    /// Current catalog price. The cart snapshots this at add-time and does
    /// not refresh it afterward.
    pub price: Decimal,
    pub available: bool,
}

/// Read-only access to product records.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Look up a single product by ID.
    ///
    /// Returns `Ok(None)` if the product does not exist.
    async fn product(&self, id: ProductId) -> Result<Option<Product>>;

    /// Look up every product in `ids` with a single batched query.
    ///
    /// IDs the catalog does not know are silently absent from the result.
    /// Result order is unspecified.
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>>;
}
