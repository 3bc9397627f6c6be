//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::admin::AdminGate;
use crate::feed::ProductFeed;
use crate::publisher::EventPublisher;
use crate::services::{CatalogService, OrderIntakeService};
use crate::store::{OrderStore, ProductStore};

/// Cheap to clone: every service holds its collaborators behind `Arc`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub catalog: CatalogService,
    pub orders: OrderIntakeService,
    pub admin: AdminGate,
}

impl AppState {
    pub fn new(
        feed: Arc<dyn ProductFeed>,
        products: Arc<dyn ProductStore>,
        orders: Arc<dyn OrderStore>,
        admin: AdminGate,
        events: EventPublisher,
    ) -> Self {
        Self {
            catalog: CatalogService::new(feed, products, events.clone()),
            orders: OrderIntakeService::new(orders, events),
            admin,
        }
    }
}
