//! Cartwheel Commerce - session cart and co-purchase recommendations.
//!
//! This crate provides the in-process building blocks a storefront wires into
//! its request handlers:
//!
//! - [`cart::Cart`] - a visitor's in-progress selection, persisted as a single
//!   serialized slot in the hosting framework's session store
//! - [`recommender::Recommender`] - "frequently bought together" suggestions
//!   accumulated in a Redis-like sorted-set store, no offline batch job needed
//! - [`orders`] - snapshotting a cart into an order at checkout
//!
//! Storage is abstracted behind the [`session::SessionStore`],
//! [`scores::ScoreStore`], and [`catalog::Catalog`] traits so the same logic
//! runs against Redis/Postgres in production and in-memory stores in tests.
//! Store handles are constructor-injected; this crate holds no globals.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod orders;
pub mod recommender;
pub mod scores;
pub mod session;

pub use cart::{Cart, CartItem, CartLine};
pub use catalog::{Catalog, Product};
pub use error::{CommerceError, Result};
pub use recommender::Recommender;
pub use scores::ScoreStore;
pub use session::SessionStore;
