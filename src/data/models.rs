//! Data models for the product catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product as stored and served.
///
/// `price` stays a numeric string end to end: the store keeps it as TEXT
/// and the API serializes it verbatim, the way a NUMERIC column travels
/// over JSON. Normalization to a number happens exactly once, in the
/// consuming client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Database row id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Short description shown in listings
    pub description: String,
    /// Unit price as a numeric string (e.g. "19.99")
    pub price: String,
    /// Optional image URL; the UI falls back to an icon when absent
    pub image_url: Option<String>,
    /// When the row was created
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product with the current timestamp. The id is assigned
    /// by the store on insert; 0 marks an unsaved row.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: impl Into<String>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            price: price.into(),
            image_url,
            created_at: Utc::now(),
        }
    }
}
