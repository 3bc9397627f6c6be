//! Aggregates module
pub mod product;
pub mod order;

pub use product::{FeedItem, LocalProductRow, Product, ProductDraft, ProductSource};
pub use order::{InvalidOrder, NewOrder, Order, OrderLine, OrderSubmission};
