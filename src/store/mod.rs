//! Durable stores for locally owned products and checkout orders.
//!
//! The merge and intake services only see the two traits below. `postgres`
//! is the production backend; `memory` backs local development without a
//! database and the test suite (including simulated outages).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::aggregates::{LocalProductRow, NewOrder, Order, ProductDraft};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self) -> Result<Vec<LocalProductRow>, StoreError>;

    /// `Ok(None)` when no record has this id, including ids the store could never have issued.
    async fn get(&self, id: &str) -> Result<Option<LocalProductRow>, StoreError>;

    async fn insert(&self, draft: &ProductDraft) -> Result<LocalProductRow, StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists the order, assigning its id, status and creation time.
    async fn insert(&self, order: &NewOrder) -> Result<Order, StoreError>;

    async fn list_newest_first(&self) -> Result<Vec<Order>, StoreError>;
}
