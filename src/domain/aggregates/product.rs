//! Product Aggregate
//!
//! One canonical [`Product`] shape for the merged catalog. The two raw
//! shapes it is built from are the external feed item ([`FeedItem`]) and the
//! local store row ([`LocalProductRow`]); both normalizers live here so the
//! identity rules sit next to the type they protect.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};
use crate::domain::value_objects::{Money, ProductRef, Rating};

/// Where a catalog entry came from. Only `Local` products are ever mutable here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSource { External, Local }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<u64>,
    pub title: String,
    pub price: Money,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: Rating,
    pub source: ProductSource,
}

/// Raw item as served by the external feed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FeedItem {
    pub id: u64,
    pub title: String,
    pub price: Money,
    #[serde(default)] pub description: String,
    #[serde(default)] pub category: String,
    #[serde(default)] pub image: String,
    #[serde(default)] pub rating: Option<Rating>,
}

/// Raw row as held by the local product store.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalProductRow {
    pub id: String,
    pub title: String,
    pub price_cents: i64,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: String,
    /// Stored as an opaque document; anything unreadable normalizes to `{0, 0}`.
    pub rating: Option<serde_json::Value>,
}

impl Product {
    pub fn from_feed(item: FeedItem) -> Self {
        Self {
            id: ProductRef::external_id(item.id),
            external_id: Some(item.id),
            title: item.title,
            price: item.price,
            description: item.description,
            category: item.category,
            image: item.image,
            rating: item.rating.unwrap_or_default(),
            source: ProductSource::External,
        }
    }

    pub fn from_local(row: LocalProductRow) -> Self {
        let rating = row
            .rating
            .and_then(|value| serde_json::from_value::<Rating>(value).ok())
            .unwrap_or_default();
        Self {
            id: row.id,
            external_id: None,
            title: row.title,
            price: Money::from_cents(row.price_cents),
            description: row.description.unwrap_or_default(),
            category: row.category.unwrap_or_default(),
            image: row.image,
            rating,
            source: ProductSource::Local,
        }
    }

    pub fn is_mutable(&self) -> bool { self.source == ProductSource::Local }
}

/// Admin submission for a new local product.
#[derive(Clone, Debug, PartialEq, Deserialize, Validate)]
pub struct ProductDraft {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub price: Money,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[validate(url(message = "Invalid image URL"))]
    pub image: String,
    #[serde(default)]
    pub rating: Option<Rating>,
}

impl ProductDraft {
    /// Runs field validation, returning the first failure as a readable message.
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| first_message(&e))?;
        if let Some(rating) = &self.rating {
            rating.validate().map_err(|e| first_message(&e))?;
        }
        Ok(())
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    let mut names: Vec<_> = fields.keys().copied().collect();
    names.sort_unstable();
    names
        .first()
        .and_then(|name| fields.get(name).and_then(|errs| errs.first()).map(|err| (name, err)))
        .map(|(name, err)| match &err.message {
            Some(message) => message.to_string(),
            None => format!("{name} is invalid"),
        })
        .unwrap_or_else(|| "Invalid input".to_string())
}
