//! Co-purchase recommender.
//!
//! Records which products are purchased together and serves top-N "frequently
//! bought together" suggestions, with no offline batch job. Each product owns
//! one sorted set mapping companion product ID to an accumulated
//! co-occurrence count. Scores are symmetric in intent (A's set tracks B and
//! B's set tracks A) but the two updates are independent commands; a crash
//! mid-update leaves partial scores, tolerated because scores are advisory.

use tracing::instrument;

use cartwheel_core::ProductId;

use crate::catalog::{Catalog, Product};
use crate::error::Result;
use crate::scores::ScoreStore;

/// Default number of suggestions returned by [`Recommender::suggest_default`].
pub const DEFAULT_MAX_RESULTS: usize = 6;

/// Companion sorted-set key for a product.
fn product_key(id: ProductId) -> String {
    format!("product:{id}:purchased_with")
}

/// Temporary union key for a multi-product suggestion.
///
/// Named deterministically from the concatenated product IDs. Two concurrent
/// requests for the same product set share this name and can interleave; the
/// key lives for well under a millisecond and is deleted immediately after
/// use, but the naming scheme has no uniqueness guarantee.
fn tmp_key(ids: &[ProductId]) -> String {
    let flat: String = ids.iter().map(ToString::to_string).collect();
    format!("tmp_{flat}")
}

/// Deduplicate IDs, preserving first-seen order.
fn distinct(ids: &[ProductId]) -> Vec<ProductId> {
    let mut seen = Vec::with_capacity(ids.len());
    for &id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

/// Co-purchase scoring over an injected sorted-set store.
pub struct Recommender<S: ScoreStore> {
    store: S,
}

impl<S: ScoreStore> Recommender<S> {
    /// Create a recommender over the given score store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Record that `products` were purchased together.
    ///
    /// For every ordered pair (A, B) of distinct products in the set, A's
    /// companion score for B is incremented by 1. Quadratic in the number of
    /// distinct products - fine, order line counts are small. Increments are
    /// separate store commands; nothing ties the pair's two updates together.
    ///
    /// # Errors
    ///
    /// Returns an error if the score store is unavailable; scores recorded
    /// before the failure stay recorded.
    #[instrument(skip(self))]
    pub async fn record_co_purchase(&self, products: &[ProductId]) -> Result<()> {
        let ids = distinct(products);
        for &id in &ids {
            for &companion in &ids {
                if id != companion {
                    self.store
                        .increment(&product_key(id), &companion.to_string(), 1.0)
                        .await?;
                }
            }
        }
        Ok(())
    }

    /// Suggest up to [`DEFAULT_MAX_RESULTS`] products frequently bought
    /// alongside `products`.
    ///
    /// # Errors
    ///
    /// See [`Recommender::suggest`].
    pub async fn suggest_default<C>(
        &self,
        catalog: &C,
        products: &[ProductId],
    ) -> Result<Vec<Product>>
    where
        C: Catalog + ?Sized,
    {
        self.suggest(catalog, products, DEFAULT_MAX_RESULTS).await
    }

    /// Suggest up to `max_results` products frequently bought alongside
    /// `products`, best-scoring first.
    ///
    /// A single product reads its companion set directly. Several products
    /// union their companion sets into a temporary key with scores summed,
    /// drop the input products themselves (a product is never its own
    /// companion), read the result, and delete the key. The four steps are
    /// not a transaction.
    ///
    /// Suggested IDs the catalog no longer knows are dropped. The result is
    /// re-sorted to the store's descending-score order, since the batched
    /// catalog query guarantees no order.
    ///
    /// # Errors
    ///
    /// Returns an error if the score store or the catalog is unavailable.
    #[instrument(skip(self, catalog))]
    pub async fn suggest<C>(
        &self,
        catalog: &C,
        products: &[ProductId],
        max_results: usize,
    ) -> Result<Vec<Product>>
    where
        C: Catalog + ?Sized,
    {
        let ids = distinct(products);

        let ranked: Vec<String> = match ids.as_slice() {
            [] => Vec::new(),
            [only] => self.store.members_by_score_desc(&product_key(*only)).await?,
            _ => {
                let tmp = tmp_key(&ids);
                let keys: Vec<String> = ids.iter().copied().map(product_key).collect();
                self.store.union_into(&tmp, &keys).await?;

                let own_members: Vec<String> = ids.iter().map(ToString::to_string).collect();
                self.store.remove_members(&tmp, &own_members).await?;

                let ranked = self.store.members_by_score_desc(&tmp).await?;
                self.store.delete(&tmp).await?;
                ranked
            }
        };

        let suggested_ids: Vec<ProductId> = ranked
            .iter()
            .take(max_results)
            .filter_map(|member| member.parse::<ProductId>().ok())
            .collect();

        let mut suggested = catalog.products_by_ids(&suggested_ids).await?;
        suggested.sort_by_key(|p| {
            suggested_ids
                .iter()
                .position(|&id| id == p.id)
                .unwrap_or(usize::MAX)
        });

        Ok(suggested)
    }
}
