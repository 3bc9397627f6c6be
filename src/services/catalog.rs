//! Catalog merge service.
//!
//! Buyers see one listing built from the external feed and the local store.
//! Ids never collide: feed products live under the `external:` prefix and
//! local products keep their native store key.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::aggregates::{Product, ProductDraft};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{InvalidProductId, ProductRef};
use crate::feed::ProductFeed;
use crate::publisher::EventPublisher;
use crate::store::{ProductStore, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    InvalidId(#[from] InvalidProductId),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct CatalogService {
    feed: Arc<dyn ProductFeed>,
    products: Arc<dyn ProductStore>,
    events: EventPublisher,
}

impl CatalogService {
    pub fn new(feed: Arc<dyn ProductFeed>, products: Arc<dyn ProductStore>, events: EventPublisher) -> Self {
        Self { feed, products, events }
    }

    /// Merged listing, external products first. Never fails: an unavailable
    /// source contributes nothing and is logged.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Vec<Product> {
        let (external, local) = tokio::join!(self.feed.fetch_all(), self.products.list());

        let external = match external {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "External feed unavailable, listing local products only");
                Vec::new()
            }
        };
        let local = match local {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Local store unavailable, listing external products only");
                Vec::new()
            }
        };

        external
            .into_iter()
            .map(Product::from_feed)
            .chain(local.into_iter().map(Product::from_local))
            .collect()
    }

    /// `Ok(None)` means the targeted source has no such product.
    #[instrument(skip(self))]
    pub async fn get_one(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        match ProductRef::parse(id)? {
            ProductRef::External(external_id) => match self.feed.fetch_one(external_id).await {
                Ok(item) => Ok(item.map(Product::from_feed)),
                Err(e) => {
                    warn!(error = %e, external_id, "External feed lookup failed");
                    Ok(None)
                }
            },
            ProductRef::Local(key) => Ok(self.products.get(&key).await?.map(Product::from_local)),
        }
    }

    /// Validates and stores a new local product.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        draft.check().map_err(CatalogError::InvalidInput)?;
        let product = Product::from_local(self.products.insert(&draft).await?);
        info!(product_id = %product.id, "Created local product");

        self.events
            .publish(&DomainEvent::ProductCreated {
                product_id: product.id.clone(),
                title: product.title.clone(),
                price_cents: product.price.cents(),
            })
            .await;
        Ok(product)
    }
}
