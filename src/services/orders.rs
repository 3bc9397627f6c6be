//! Order intake service.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument};

use crate::domain::aggregates::{InvalidOrder, Order, OrderSubmission};
use crate::domain::events::DomainEvent;
use crate::publisher::EventPublisher;
use crate::store::{OrderStore, StoreError};

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Invalid(#[from] InvalidOrder),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct OrderIntakeService {
    orders: Arc<dyn OrderStore>,
    events: EventPublisher,
}

impl OrderIntakeService {
    pub fn new(orders: Arc<dyn OrderStore>, events: EventPublisher) -> Self { Self { orders, events } }

    /// Validates a checkout and persists it. A store failure is always
    /// returned; the caller must learn the order was not taken.
    #[instrument(skip_all)]
    pub async fn create(&self, submission: OrderSubmission) -> Result<Order, IntakeError> {
        let new_order = submission.validate()?;
        let item_count = new_order.item_count();

        let order = self.orders.insert(&new_order).await.map_err(|e| {
            error!(error = %e, "Failed to persist order");
            e
        })?;
        info!(order_id = %order.id, total = order.total, item_count, "Order placed");

        self.events
            .publish(&DomainEvent::OrderPlaced { order_id: order.id, total_cents: order.total, item_count })
            .await;
        Ok(order)
    }

    /// All orders, newest first. An empty vector means there are none; an
    /// unreachable store is an error.
    #[instrument(skip_all)]
    pub async fn list(&self) -> Result<Vec<Order>, StoreError> {
        self.orders.list_newest_first().await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    fn service() -> (OrderIntakeService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (OrderIntakeService::new(store.clone(), EventPublisher::disabled()), store)
    }

    fn submission(body: serde_json::Value) -> OrderSubmission { serde_json::from_value(body).unwrap() }

    fn valid() -> OrderSubmission {
        submission(json!({
            "email": "a@b.com",
            "items": [{ "productId": "x", "title": "T", "price": 9.99, "qty": 2, "image": "u" }],
            "total": 1998
        }))
    }

    #[tokio::test]
    async fn test_create_assigns_identity() {
        let (intake, _) = service();
        let order = intake.create(valid()).await.unwrap();
        assert_eq!(order.email, "a@b.com");
        assert_eq!(order.total, 1998);
        assert_eq!(order.status, "placed");
        assert_eq!(order.items.len(), 1);
        assert!(!order.id.is_nil());
    }

    #[tokio::test]
    async fn test_create_rejects_before_persisting() {
        let (intake, _) = service();
        let err = intake.create(submission(json!({ "email": "", "items": [], "total": 5 }))).await.unwrap_err();
        assert!(matches!(err, IntakeError::Invalid(InvalidOrder::MissingEmail)));
        let err = intake.create(submission(json!({ "email": "a@b.com", "items": [], "total": 0 }))).await.unwrap_err();
        assert!(matches!(err, IntakeError::Invalid(InvalidOrder::MissingItems)));
        assert!(intake.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_accepts_max_quantities() {
        let (intake, _) = service();
        let line = json!({ "productId": "x", "title": "T", "price": 9.99, "qty": u32::MAX, "image": "u" });
        let order = intake
            .create(submission(json!({ "email": "a@b.com", "items": [line.clone(), line], "total": 1 })))
            .await
            .unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(intake.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_surfaces_store_failure() {
        let (intake, store) = service();
        store.set_offline(true);
        assert!(matches!(intake.create(valid()).await, Err(IntakeError::Store(_))));
    }

    #[tokio::test]
    async fn test_list_newest_first_and_outage() {
        let (intake, store) = service();
        assert!(intake.list().await.unwrap().is_empty());
        let first = intake.create(valid()).await.unwrap();
        let second = intake.create(valid()).await.unwrap();
        let listed = intake.list().await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        store.set_offline(true);
        assert!(intake.list().await.is_err());
    }
}
