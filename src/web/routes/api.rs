//! REST API route definitions.

use axum::{routing::get, Router};

use crate::web::handlers::products;
use crate::web::state::AppState;

/// Build the API router with all REST endpoints.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
}
