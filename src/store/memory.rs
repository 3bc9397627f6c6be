//! In-memory store, used when no database is configured and by the tests.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{OrderStore, ProductStore, StoreError};
use crate::domain::aggregates::order::DEFAULT_STATUS;
use crate::domain::aggregates::{LocalProductRow, NewOrder, Order, ProductDraft};

/// Products get small sequential ids, the same shape a serial column hands out.
#[derive(Default)]
pub struct MemoryStore {
    products: RwLock<Vec<LocalProductRow>>,
    orders: RwLock<Vec<Order>>,
    next_product_id: AtomicU64,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    /// Makes every call fail as if the backing database were unreachable.
    pub fn set_offline(&self, offline: bool) { self.offline.store(offline, Ordering::SeqCst); }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self) -> Result<Vec<LocalProductRow>, StoreError> {
        self.ensure_online()?;
        Ok(self.products.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<LocalProductRow>, StoreError> {
        self.ensure_online()?;
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, draft: &ProductDraft) -> Result<LocalProductRow, StoreError> {
        self.ensure_online()?;
        let id = self.next_product_id.fetch_add(1, Ordering::SeqCst) + 1;
        let rating = serde_json::to_value(draft.rating.unwrap_or_default())
            .map_err(|e| StoreError::Corrupt { id: id.to_string(), reason: e.to_string() })?;
        let row = LocalProductRow {
            id: id.to_string(),
            title: draft.title.clone(),
            price_cents: draft.price.cents(),
            description: draft.description.clone(),
            category: draft.category.clone(),
            image: draft.image.clone(),
            rating: Some(rating),
        };
        self.products.write().await.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert(&self, order: &NewOrder) -> Result<Order, StoreError> {
        self.ensure_online()?;
        let order = Order {
            id: Uuid::now_v7(),
            email: order.email.clone(),
            items: order.items.clone(),
            total: order.total,
            status: DEFAULT_STATUS.to_string(),
            created_at: Utc::now(),
        };
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn list_newest_first(&self) -> Result<Vec<Order>, StoreError> {
        self.ensure_online()?;
        // Insertion order is creation order.
        Ok(self.orders.read().await.iter().rev().cloned().collect())
    }
}
