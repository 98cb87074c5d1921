//! Product handlers for the catalog web API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::data::Product;
use crate::web::error::WebError;
use crate::web::state::AppState;

/// Response for a single product. Price is serialized as the stored
/// numeric string; clients normalize it themselves.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            image_url: product.image_url,
            created_at: product.created_at.to_rfc3339(),
        }
    }
}

/// List all products, ordered by id ascending.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, WebError> {
    let products = state
        .store()
        .get_all()
        .map_err(|e| WebError::Internal(format!("Failed to fetch products: {}", e)))?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Get a single product by id.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, WebError> {
    let product = state
        .store()
        .get_by_id(id)
        .map_err(|e| WebError::Internal(format!("Failed to fetch product: {}", e)))?
        .ok_or_else(|| WebError::NotFound("Product not found".to_string()))?;

    Ok(Json(product.into()))
}
