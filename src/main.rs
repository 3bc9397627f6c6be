//! Storefront catalog service

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_catalog::feed::HttpProductFeed;
use storefront_catalog::publisher::EventPublisher;
use storefront_catalog::store::{MemoryStore, OrderStore, PgStore, ProductStore};
use storefront_catalog::{router, seed, AdminGate, AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "storefront_catalog=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.uses_default_admin_token() {
        tracing::warn!("ADMIN_TOKEN not set, using the development default");
    }

    let (products, orders): (Arc<dyn ProductStore>, Arc<dyn OrderStore>) = match &config.database_url {
        Some(url) => {
            let store = Arc::new(PgStore::connect_lazy(url).context("invalid DATABASE_URL")?);
            if let Err(e) = store.migrate().await {
                tracing::warn!(error = %e, "Migrations not applied, local store may be unavailable");
            }
            let products: Arc<dyn ProductStore> = store.clone();
            let orders: Arc<dyn OrderStore> = store;
            (products, orders)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, local products and orders are kept in memory");
            let store = Arc::new(MemoryStore::new());
            let products: Arc<dyn ProductStore> = store.clone();
            let orders: Arc<dyn OrderStore> = store;
            (products, orders)
        }
    };

    if config.seed_catalog {
        match seed::seed_catalog(products.as_ref()).await {
            Ok(count) => tracing::info!(count, "Catalog seeding finished"),
            Err(e) => tracing::warn!(error = %e, "Catalog seeding skipped"),
        }
    }

    let feed = HttpProductFeed::new(config.feed_url.clone(), config.feed_timeout).context("failed to build feed client")?;
    let events = EventPublisher::connect(config.nats_url.as_deref()).await;
    let state = AppState::new(Arc::new(feed), products, orders, AdminGate::new(config.admin_token.clone()), events);

    let addr = config.socket_addr();
    tracing::info!(%addr, feed = %config.feed_url, "Storefront catalog listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;
    Ok(())
}
