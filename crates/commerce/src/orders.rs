//! Order placement.
//!
//! Checkout snapshots the cart's lines into an order, tells the recommender
//! which products were bought together, and clears the cart. Payment capture
//! and confirmation email dispatch happen elsewhere.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use cartwheel_core::{OrderId, ProductId};

use crate::cart::Cart;
use crate::error::{CommerceError, Result};
use crate::recommender::Recommender;
use crate::scores::ScoreStore;
use crate::session::SessionStore;

/// Customer details collected by the checkout form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub address: String,
}

/// One ordered product, with the price the customer saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderLine {
    /// Line cost: `quantity × unit_price`.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A placed order: customer details plus a snapshot of the cart lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Assigned by the persistence layer; `None` until stored.
    pub id: Option<OrderId>,
    pub name: String,
    pub email: String,
    pub address: String,
    pub paid: bool,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Total cost across all lines.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.lines.iter().map(OrderLine::cost).sum()
    }
}

/// Turn the cart into an order.
///
/// Snapshots the current lines, records the co-purchase set with the
/// recommender, and clears the cart. The order is returned unpersisted and
/// unpaid.
///
/// # Errors
///
/// Returns [`CommerceError::EmptyCart`] if the cart holds no lines, or a
/// store error if recording scores or clearing the session slot fails.
#[instrument(skip_all, fields(customer = %customer.email))]
pub async fn place_order<S, Z>(
    cart: &mut Cart<'_, S>,
    recommender: &Recommender<Z>,
    customer: CustomerDetails,
) -> Result<Order>
where
    S: SessionStore + ?Sized,
    Z: ScoreStore,
{
    if cart.is_empty() {
        return Err(CommerceError::EmptyCart);
    }

    let lines: Vec<OrderLine> = cart
        .lines()
        .iter()
        .map(|line| OrderLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
        })
        .collect();

    let product_ids: Vec<ProductId> = lines.iter().map(|l| l.product_id).collect();
    recommender.record_co_purchase(&product_ids).await?;

    cart.clear().await?;

    Ok(Order {
        id: None,
        name: customer.name,
        email: customer.email,
        address: customer.address,
        paid: false,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use crate::catalog::Product;
    use crate::scores::MemoryScoreStore;
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

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Antonio".to_string(),
            email: "antonio@example.com".to_string(),
            address: "1 Main St".to_string(),
        }
    }

    #[tokio::test]
    async fn order_snapshots_cart_lines_and_total() {
        let store = MemorySessionStore::new();
        let recommender = Recommender::new(MemoryScoreStore::new());
        let mut cart = Cart::load(&store, keys::CART).await.expect("load");

        cart.add(&product(1, Decimal::new(500, 2)), 2, false)
            .await
            .expect("add");
        cart.add(&product(2, Decimal::new(2000, 2)), 1, false)
            .await
            .expect("add");
        let cart_total = cart.total_price();

        let order = place_order(&mut cart, &recommender, customer())
            .await
            .expect("place order");

        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.total_cost(), cart_total);
        assert!(!order.paid);
        assert_eq!(order.id, None);
    }

    #[tokio::test]
    async fn placing_an_order_clears_the_cart_and_feeds_the_recommender() {
        let store = MemorySessionStore::new();
        let recommender = Recommender::new(MemoryScoreStore::new());
        let catalog = crate::catalog::InMemoryCatalog::new();
        catalog.insert(product(1, Decimal::new(500, 2)));
        catalog.insert(product(2, Decimal::new(2000, 2)));

        let mut cart = Cart::load(&store, keys::CART).await.expect("load");
        cart.add(&product(1, Decimal::new(500, 2)), 1, false)
            .await
            .expect("add");
        cart.add(&product(2, Decimal::new(2000, 2)), 1, false)
            .await
            .expect("add");

        place_order(&mut cart, &recommender, customer())
            .await
            .expect("place order");

        assert!(cart.is_empty());

        let suggested = recommender
            .suggest_default(&catalog, &[ProductId::new(1)])
            .await
            .expect("suggest");
        let got: Vec<i32> = suggested.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(got, vec![2]);
    }

    #[tokio::test]
    async fn empty_cart_cannot_be_ordered() {
        let store = MemorySessionStore::new();
        let recommender = Recommender::new(MemoryScoreStore::new());
        let mut cart = Cart::load(&store, keys::CART).await.expect("load");

        let err = place_order(&mut cart, &recommender, customer())
            .await
            .expect_err("empty cart must be rejected");
        assert!(matches!(err, CommerceError::EmptyCart));
    }
}
