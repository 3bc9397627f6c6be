//! HTTP routes.
//!
//! Buyer-facing reads and checkout are open; product creation and order
//! listing require the admin token.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::admin::RequireAdmin;
use crate::domain::aggregates::{Order, OrderSubmission, Product, ProductDraft};
use crate::error::{AppError, Result};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/products", get(list_products).post(create_product))
        .route("/api/v1/products/:id", get(get_product))
        .route("/api/v1/orders", get(list_orders).post(create_order))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "storefront-catalog" }))
}

/// Always `200`: an unavailable source only shrinks the listing.
#[instrument(skip(s))]
async fn list_products(State(s): State<AppState>) -> Json<Vec<Product>> {
    Json(s.catalog.list_all().await)
}

#[instrument(skip(s))]
async fn get_product(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    s.catalog.get_one(&id).await?.map(Json).ok_or(AppError::NotFound("Product not found"))
}

#[instrument(skip_all)]
async fn create_product(
    _admin: RequireAdmin,
    State(s): State<AppState>,
    payload: std::result::Result<Json<ProductDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(draft) = payload?;
    Ok((StatusCode::CREATED, Json(s.catalog.create(draft).await?)))
}

#[instrument(skip_all)]
async fn create_order(
    State(s): State<AppState>,
    payload: std::result::Result<Json<OrderSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>)> {
    let Json(submission) = payload?;
    Ok((StatusCode::CREATED, Json(s.orders.create(submission).await?)))
}

#[instrument(skip_all)]
async fn list_orders(_admin: RequireAdmin, State(s): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(s.orders.list().await?))
}
