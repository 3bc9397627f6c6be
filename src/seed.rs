//! Demo catalog for a fresh local store.

use tracing::info;

use crate::domain::aggregates::ProductDraft;
use crate::domain::value_objects::{Money, Rating};
use crate::store::{ProductStore, StoreError};

fn demo_products() -> Vec<ProductDraft> {
    let product = |title: &str, description: &str, cents: i64, image: &str| ProductDraft {
        title: title.to_string(),
        price: Money::from_cents(cents),
        description: Some(description.to_string()),
        category: Some("featured".to_string()),
        image: image.to_string(),
        rating: Some(Rating::default()),
    };
    vec![
        product(
            "Premium Wireless Headphones",
            "Crystal clear sound with active noise cancellation and 30-hour battery life.",
            29999,
            "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=800&q=80",
        ),
        product(
            "Ergonomic Office Chair",
            "Adjustable lumbar support and a breathable mesh back.",
            19900,
            "https://images.unsplash.com/photo-1505843490538-5133c6c7d0e1?w=800&q=80",
        ),
        product(
            "Smart Watch Series 5",
            "Fitness tracking, heart rate monitoring and water resistance.",
            34950,
            "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=800&q=80",
        ),
        product(
            "Minimalist Backpack",
            "Water-resistant commuter pack with a laptop compartment.",
            7999,
            "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=800&q=80",
        ),
    ]
}

/// Inserts the demo products if the store holds none. Returns how many were inserted.
pub async fn seed_catalog(store: &dyn ProductStore) -> Result<usize, StoreError> {
    if !store.list().await?.is_empty() {
        return Ok(0);
    }
    let drafts = demo_products();
    for draft in &drafts {
        store.insert(draft).await?;
    }
    info!(count = drafts.len(), "Seeded local catalog");
    Ok(drafts.len())
}
