//! Application services over the domain and the stores.
pub mod catalog;
pub mod orders;

pub use catalog::{CatalogError, CatalogService};
pub use orders::{IntakeError, OrderIntakeService};
