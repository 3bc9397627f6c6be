//! Domain events
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    ProductCreated { product_id: String, title: String, price_cents: i64 },
    OrderPlaced { order_id: Uuid, total_cents: i64, item_count: u64 },
}

impl DomainEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::ProductCreated { .. } => "storefront.product.created",
            Self::OrderPlaced { .. } => "storefront.order.placed",
        }
    }
}
