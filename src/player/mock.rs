//! Mock product fetcher for deterministic playback testing.
//!
//! Implements [`ProductFetcher`] to resolve with pre-configured products
//! (or a scripted failure) without touching the network. Delays run on
//! tokio's clock, so tests under `tokio::time::pause` stay deterministic.

use std::time::Duration;

use async_trait::async_trait;

use super::fetch::{CatalogProduct, FetchError, PendingBody, ProductFetcher};

/// Scripted behavior for a [`MockFetcher`].
#[derive(Debug, Clone, Default)]
pub struct MockFetchConfig {
    /// Products returned by a successful fetch.
    pub products: Vec<CatalogProduct>,
    /// Delay before the response phase resolves (simulates latency to the
    /// service).
    pub response_delay: Duration,
    /// Delay before the body phase resolves (simulates reading the body).
    pub body_delay: Duration,
    /// Fail the response phase with this error instead of succeeding.
    pub fail_with: Option<FetchError>,
}

impl MockFetchConfig {
    pub fn with_products(mut self, products: Vec<CatalogProduct>) -> Self {
        self.products = products;
        self
    }

    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }

    pub fn with_body_delay(mut self, delay: Duration) -> Self {
        self.body_delay = delay;
        self
    }

    pub fn failing_with(mut self, error: FetchError) -> Self {
        self.fail_with = Some(error);
        self
    }
}

/// Fetcher that plays back a [`MockFetchConfig`].
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    config: MockFetchConfig,
}

impl MockFetcher {
    pub fn new(config: MockFetchConfig) -> Self {
        Self { config }
    }

    /// Shorthand for a fetcher that succeeds with `count` generated rows.
    pub fn with_product_count(count: usize) -> Self {
        let products = (0..count)
            .map(|i| CatalogProduct {
                id: i as i64 + 1,
                name: format!("Product {}", i + 1),
                description: format!("Demo product number {}", i + 1),
                price: 9.99 + i as f64,
                image_url: None,
                created_at: None,
            })
            .collect();
        Self::new(MockFetchConfig::default().with_products(products))
    }

    /// Shorthand for a fetcher whose response phase fails with an HTTP
    /// status.
    pub fn failing_with_status(status: u16) -> Self {
        Self::new(MockFetchConfig::default().failing_with(FetchError::Status(status)))
    }

    /// Shorthand for a fetcher whose response phase fails at the transport
    /// level.
    pub fn failing_with_transport(message: impl Into<String>) -> Self {
        Self::new(MockFetchConfig::default().failing_with(FetchError::Transport(message.into())))
    }
}

#[async_trait]
impl ProductFetcher for MockFetcher {
    async fn send(&self) -> Result<Box<dyn PendingBody>, FetchError> {
        if !self.config.response_delay.is_zero() {
            tokio::time::sleep(self.config.response_delay).await;
        }
        if let Some(error) = &self.config.fail_with {
            return Err(error.clone());
        }
        Ok(Box::new(MockPendingBody {
            products: self.config.products.clone(),
            body_delay: self.config.body_delay,
        }))
    }
}

#[derive(Debug)]
struct MockPendingBody {
    products: Vec<CatalogProduct>,
    body_delay: Duration,
}

#[async_trait]
impl PendingBody for MockPendingBody {
    async fn products(self: Box<Self>) -> Result<Vec<CatalogProduct>, FetchError> {
        if !self.body_delay.is_zero() {
            tokio::time::sleep(self.body_delay).await;
        }
        Ok(self.products)
    }
}
