//! Session-scoped shopping cart.
//!
//! The cart tracks a visitor's in-progress selection for the lifetime of
//! their browser session, independent of authentication state. It lives
//! entirely inside one session slot as a serialized JSON blob; every mutation
//! persists the updated blob back to the [`SessionStore`].
//!
//! Prices are snapshotted at add-time, so a cart's total stays stable even if
//! catalog prices change mid-session. Missing products are absorbed silently
//! rather than raised, to keep checkout idempotent against stale links.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwheel_core::ProductId;

use crate::catalog::{Catalog, Product};
use crate::error::Result;
use crate::session::SessionStore;

/// One cart entry: a product reference with quantity and snapshotted price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price captured when the line was first added. Never refreshed
    /// from the catalog.
    pub unit_price: Decimal,
}

impl CartLine {
    /// Line total: `quantity × unit_price`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A cart line enriched with its resolved catalog record, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// A visitor's cart, loaded from and persisted to one session slot.
///
/// Lines keep insertion order. Lookups are linear; carts are small.
pub struct Cart<'a, S: SessionStore + ?Sized> {
    store: &'a S,
    key: String,
    lines: Vec<CartLine>,
}

impl<'a, S: SessionStore + ?Sized> Cart<'a, S> {
    /// Load the cart from its session slot, or start empty if the slot has
    /// never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails or the stored blob is not
    /// valid cart JSON.
    pub async fn load(store: &'a S, key: &str) -> Result<Cart<'a, S>> {
        let lines = match store.load(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)?,
            None => Vec::new(),
        };

        Ok(Self {
            store,
            key: key.to_string(),
            lines,
        })
    }

    /// Add a product to the cart or update its quantity.
    ///
    /// A new line snapshots the product's current catalog price. An existing
    /// line keeps its snapshot; `override_quantity` decides whether the given
    /// quantity replaces or increments the stored one. No upper bound on
    /// quantity is enforced here - that is the form layer's job.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the updated blob fails.
    pub async fn add(
        &mut self,
        product: &Product,
        quantity: u32,
        override_quantity: bool,
    ) -> Result<()> {
        match self.lines.iter().position(|l| l.product_id == product.id) {
            Some(idx) if override_quantity => self.lines[idx].quantity = quantity,
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line.quantity.saturating_add(quantity);
            }
            None => self.lines.push(CartLine {
                product_id: product.id,
                quantity,
                unit_price: product.price,
            }),
        }

        self.save().await
    }

    /// Remove a product's line from the cart.
    ///
    /// Silently does nothing if the product was never in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the updated blob fails.
    pub async fn remove(&mut self, product_id: ProductId) -> Result<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == before {
            return Ok(());
        }
        self.save().await
    }

    /// Resolve the cart into display items, in insertion order.
    ///
    /// All referenced products are fetched in one batched catalog query, so
    /// request cost stays at one round trip regardless of cart size. Lines
    /// whose product has vanished from the catalog are skipped. Iterate the
    /// returned `Vec` with `iter()`; it is finite and restartable.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog query fails.
    pub async fn items<C>(&self, catalog: &C) -> Result<Vec<CartItem>>
    where
        C: Catalog + ?Sized,
    {
        let ids: Vec<ProductId> = self.lines.iter().map(|l| l.product_id).collect();
        let by_id: HashMap<ProductId, Product> = catalog
            .products_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(self
            .lines
            .iter()
            .filter_map(|line| {
                by_id.get(&line.product_id).map(|product| CartItem {
                    product: product.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    line_total: line.total(),
                })
            })
            .collect())
    }

    /// Total price across all lines, from the snapshotted unit prices.
    ///
    /// Zero for an empty cart. Does not touch the catalog.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::total).sum()
    }

    /// Total number of items: the sum of quantities, not the number of
    /// distinct products.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The raw lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Empty the cart and persist the empty blob; used after a successful
    /// checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub async fn clear(&mut self) -> Result<()> {
        self.lines.clear();
        self.save().await
    }

    async fn save(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&self.lines)?;
        tracing::debug!(key = %self.key, lines = self.lines.len(), "persisting cart");
        self.store.save(&self.key, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::InMemoryCatalog;
    use crate::session::{MemorySessionStore, keys};

    use super::*;

    fn product(id: i32, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            slug: format!("product-{id}"),
            price,
            available: true,
        }
    }

    async fn empty_cart(store: &MemorySessionStore) -> Cart<'_, MemorySessionStore> {
        Cart::load(store, keys::CART).await.expect("load cart")
    }

    #[tokio::test]
    async fn starts_empty() {
        let store = MemorySessionStore::new();
        let cart = empty_cart(&store).await;

        assert!(cart.is_empty());
        assert_eq!(cart.len(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn add_increments_quantity_by_default() {
        let store = MemorySessionStore::new();
        let mut cart = empty_cart(&store).await;
        let p = product(1, Decimal::new(999, 2));

        cart.add(&p, 2, false).await.expect("add");
        cart.add(&p, 3, false).await.expect("add");

        assert_eq!(cart.lines()[0].quantity, 5);
        assert_eq!(cart.len(), 5);
    }

    #[tokio::test]
    async fn incrementing_a_huge_quantity_saturates_instead_of_panicking() {
        // No upper bound is enforced here; absurd quantities are the form
        // layer's problem, but they must not panic the cart.
        let store = MemorySessionStore::new();
        let mut cart = empty_cart(&store).await;
        let p = product(1, Decimal::new(100, 2));

        cart.add(&p, u32::MAX, false).await.expect("add");
        cart.add(&p, 1, false).await.expect("add");

        assert_eq!(cart.lines()[0].quantity, u32::MAX);
    }

    #[tokio::test]
    async fn add_with_override_replaces_quantity() {
        let store = MemorySessionStore::new();
        let mut cart = empty_cart(&store).await;
        let p = product(1, Decimal::new(999, 2));

        cart.add(&p, 2, false).await.expect("add");
        cart.add(&p, 3, true).await.expect("add");

        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[tokio::test]
    async fn remove_missing_product_is_a_no_op() {
        let store = MemorySessionStore::new();
        let mut cart = empty_cart(&store).await;
        let p = product(1, Decimal::new(500, 2));

        cart.add(&p, 1, false).await.expect("add");
        cart.remove(ProductId::new(42)).await.expect("remove");

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_price(), Decimal::new(500, 2));
    }

    #[tokio::test]
    async fn len_is_sum_of_quantities() {
        let store = MemorySessionStore::new();
        let mut cart = empty_cart(&store).await;

        cart.add(&product(1, Decimal::new(100, 2)), 2, false)
            .await
            .expect("add");
        cart.add(&product(2, Decimal::new(200, 2)), 3, false)
            .await
            .expect("add");
        assert_eq!(cart.len(), 5);

        cart.remove(ProductId::new(1)).await.expect("remove");
        assert_eq!(cart.len(), 3);
    }

    #[tokio::test]
    async fn total_uses_price_snapshot_not_current_catalog_price() {
        let store = MemorySessionStore::new();
        let catalog = InMemoryCatalog::new();
        let mut cart = empty_cart(&store).await;

        let p = product(1, Decimal::new(500, 2));
        catalog.insert(p.clone());
        cart.add(&p, 2, false).await.expect("add");

        // Catalog price changes mid-session; the cart total must not move.
        let mut repriced = p;
        repriced.price = Decimal::new(900, 2);
        catalog.insert(repriced);

        assert_eq!(cart.total_price(), Decimal::new(1000, 2));

        let items = cart.items(&catalog).await.expect("items");
        assert_eq!(items[0].unit_price, Decimal::new(500, 2));
        assert_eq!(items[0].line_total, Decimal::new(1000, 2));
        // The resolved record still reflects the catalog's current state.
        assert_eq!(items[0].product.price, Decimal::new(900, 2));
    }

    #[tokio::test]
    async fn items_preserve_insertion_order_and_skip_vanished_products() {
        let store = MemorySessionStore::new();
        let catalog = InMemoryCatalog::new();
        let mut cart = empty_cart(&store).await;

        for id in [3, 1, 2] {
            let p = product(id, Decimal::new(i64::from(id) * 100, 2));
            catalog.insert(p.clone());
            cart.add(&p, 1, false).await.expect("add");
        }
        catalog.remove(ProductId::new(1));

        let items = cart.items(&catalog).await.expect("items");
        let ids: Vec<i32> = items.iter().map(|i| i.product.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn clear_empties_cart_and_session_slot() {
        let store = MemorySessionStore::new();
        let catalog = InMemoryCatalog::new();
        let mut cart = empty_cart(&store).await;

        cart.add(&product(1, Decimal::new(500, 2)), 2, false)
            .await
            .expect("add");
        cart.clear().await.expect("clear");

        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert!(cart.items(&catalog).await.expect("items").is_empty());

        // A fresh load from the same session sees the cleared state.
        let reloaded = empty_cart(&store).await;
        assert!(reloaded.is_empty());
    }

    #[tokio::test]
    async fn cart_persists_across_loads_within_a_session() {
        let store = MemorySessionStore::new();
        {
            let mut cart = empty_cart(&store).await;
            cart.add(&product(1, Decimal::new(750, 2)), 2, false)
                .await
                .expect("add");
        }

        let cart = empty_cart(&store).await;
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_price(), Decimal::new(1500, 2));
    }

    #[tokio::test]
    async fn worked_example() {
        // add(10, qty 2, price 5.00); add(11, qty 1, price 20.00)
        // total 30.00, len 3; remove(10) -> total 20.00
        let store = MemorySessionStore::new();
        let mut cart = empty_cart(&store).await;

        cart.add(&product(10, Decimal::new(500, 2)), 2, false)
            .await
            .expect("add");
        cart.add(&product(11, Decimal::new(2000, 2)), 1, false)
            .await
            .expect("add");

        assert_eq!(cart.total_price(), Decimal::new(3000, 2));
        assert_eq!(cart.len(), 3);

        cart.remove(ProductId::new(10)).await.expect("remove");
        assert_eq!(cart.total_price(), Decimal::new(2000, 2));
    }
}
