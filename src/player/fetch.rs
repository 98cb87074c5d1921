//! Network orchestrator: the one real call underneath the playback.
//!
//! The fetch is split into two phases so the controller can mark the
//! service stage complete when the response arrives and join the store
//! stage on the body read: `send()` resolves once status is known,
//! `products()` reads and decodes the body.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure surfaced by the orchestrator. No retries happen here; retry and
/// backoff live in the backend's connection bootstrap, not the client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The service answered with a non-success status.
    #[error("request failed with HTTP status {0}")]
    Status(u16),
    /// The call could not complete at the transport level.
    #[error("network error: {0}")]
    Transport(String),
    /// The body arrived but could not be decoded.
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// A product as consumed by the player, with the price already normalized
/// to a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub created_at: Option<String>,
}

/// Price as it appears on the wire. The service serializes its NUMERIC
/// column as a string, but an already-numeric value is accepted too so
/// normalization is idempotent.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WirePrice {
    Text(String),
    Number(f64),
}

impl WirePrice {
    pub(crate) fn normalize(self) -> Result<f64, FetchError> {
        match self {
            WirePrice::Number(value) => Ok(value),
            WirePrice::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| FetchError::Decode(format!("invalid price value: {text:?}"))),
        }
    }
}

/// One row of the product-listing response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireProduct {
    id: i64,
    name: String,
    description: String,
    price: WirePrice,
    image_url: Option<String>,
    created_at: Option<String>,
}

impl WireProduct {
    pub(crate) fn normalize(self) -> Result<CatalogProduct, FetchError> {
        Ok(CatalogProduct {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price.normalize()?,
            image_url: self.image_url,
            created_at: self.created_at,
        })
    }
}

/// Seam between the playback controller and the real network. The mock
/// implementation lives in [`crate::player::mock`].
#[async_trait]
pub trait ProductFetcher: Send + Sync {
    /// Issue the listing request. Resolves when the response status is
    /// known; any status >= 300 is already a failure here.
    async fn send(&self) -> Result<Box<dyn PendingBody>, FetchError>;
}

/// The in-flight response between headers and body.
#[async_trait]
pub trait PendingBody: Send + std::fmt::Debug {
    /// Read and decode the JSON body, normalizing prices.
    async fn products(self: Box<Self>) -> Result<Vec<CatalogProduct>, FetchError>;
}

/// Real orchestrator over reqwest, pointed at a catalog service base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn products_url(&self) -> String {
        format!("{}/api/products", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ProductFetcher for ApiClient {
    async fn send(&self) -> Result<Box<dyn PendingBody>, FetchError> {
        let response = self
            .client
            .get(self.products_url())
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        if status >= 300 {
            return Err(FetchError::Status(status));
        }

        Ok(Box::new(HttpPendingBody { response }))
    }
}

#[derive(Debug)]
struct HttpPendingBody {
    response: reqwest::Response,
}

#[async_trait]
impl PendingBody for HttpPendingBody {
    async fn products(self: Box<Self>) -> Result<Vec<CatalogProduct>, FetchError> {
        let rows: Vec<WireProduct> = self
            .response
            .json()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))?;

        rows.into_iter().map(WireProduct::normalize).collect()
    }
}
