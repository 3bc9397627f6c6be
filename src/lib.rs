//! Storefront catalog and order intake
//!
//! Backend for a small single-operator storefront.
//!
//! ## Features
//! - Merged product catalog: a read-only external feed plus locally owned products
//! - Stable catalog ids (`external:<id>` for feed products, native keys for local ones)
//! - Checkout intake with ordered validation and append-only order storage
//! - Shared-secret admin gate for product creation and order listing
//! - Optional domain events over NATS
//!
//! Money is held in integer cents throughout; unit prices are decimal dollars
//! on the wire.

pub mod admin;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod publisher;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;

pub use admin::{AdminDenied, AdminGate};
pub use config::AppConfig;
pub use domain::aggregates::{Order, Product, ProductSource};
pub use error::{AppError, Result};
pub use routes::router;
pub use state::AppState;
