//! Data persistence layer
//!
//! SQLite-based storage for the product catalog.

mod database;
mod migrations;
mod models;
mod products;

pub use database::{Database, DatabaseError, CONNECT_ATTEMPTS, CONNECT_RETRY_DELAY};
pub use migrations::run_migrations;
pub use models::Product;
pub use products::ProductStore;
