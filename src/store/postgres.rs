//! `PostgreSQL` store backed by sqlx.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{OrderStore, ProductStore, StoreError};
use crate::domain::aggregates::order::DEFAULT_STATUS;
use crate::domain::aggregates::{LocalProductRow, NewOrder, Order, OrderLine, ProductDraft};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRecord {
    id: Uuid,
    title: String,
    description: Option<String>,
    category: Option<String>,
    image: String,
    price_cents: i64,
    rating: Option<serde_json::Value>,
}

impl From<ProductRecord> for LocalProductRow {
    fn from(r: ProductRecord) -> Self {
        Self {
            id: r.id.to_string(),
            title: r.title,
            price_cents: r.price_cents,
            description: r.description,
            category: r.category,
            image: r.image,
            rating: r.rating,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRecord {
    id: Uuid,
    email: String,
    items: serde_json::Value,
    total: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRecord> for Order {
    type Error = StoreError;

    fn try_from(r: OrderRecord) -> Result<Self, Self::Error> {
        let items = serde_json::from_value::<Vec<OrderLine>>(r.items)
            .map_err(|e| StoreError::Corrupt { id: r.id.to_string(), reason: e.to_string() })?;
        Ok(Self { id: r.id, email: r.email, items, total: r.total, status: r.status, created_at: r.created_at })
    }
}

const PRODUCT_COLUMNS: &str = "id, title, description, category, image, price_cents, rating";
const ORDER_COLUMNS: &str = "id, email, items, total, status, created_at";

impl PgStore {
    pub fn new(pool: PgPool) -> Self { Self { pool } }

    /// Builds a lazily connecting pool so an unreachable database degrades
    /// requests instead of blocking startup.
    pub fn connect_lazy(database_url: &SecretString) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(3))
            .connect_lazy(database_url.expose_secret())?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list(&self) -> Result<Vec<LocalProductRow>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRecord>(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at, id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(LocalProductRow::from).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<LocalProductRow>, StoreError> {
        let Ok(id) = Uuid::parse_str(id) else { return Ok(None) };
        let row = sqlx::query_as::<_, ProductRecord>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(LocalProductRow::from))
    }

    async fn insert(&self, draft: &ProductDraft) -> Result<LocalProductRow, StoreError> {
        let row = sqlx::query_as::<_, ProductRecord>(&format!(
            "INSERT INTO products (id, title, description, category, image, price_cents, rating, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(&draft.image)
        .bind(draft.price.cents())
        .bind(Json(draft.rating.unwrap_or_default()))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn insert(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let row = sqlx::query_as::<_, OrderRecord>(&format!(
            "INSERT INTO orders (id, email, items, total, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING {ORDER_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(&order.email)
        .bind(Json(&order.items))
        .bind(order.total)
        .bind(DEFAULT_STATUS)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn list_newest_first(&self) -> Result<Vec<Order>, StoreError> {
        sqlx::query_as::<_, OrderRecord>(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }
}
