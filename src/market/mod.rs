#[cfg(feature = "full")]
pub mod compound;
#[cfg(feature = "full")]
pub mod feed;

use std::sync::{Arc, RwLock};

use crate::model::{AssetMarket, MarketSnapshot};

// ── Shared snapshot handle ──────────────────────────────────────────

/// Shared pointer to the current market snapshot.
///
/// Readers clone the inner `Arc` and keep a consistent snapshot for as long
/// as they need it; writers swap in a whole new snapshot.
#[derive(Debug, Clone)]
pub struct MarketHandle {
    current: Arc<RwLock<Arc<MarketSnapshot>>>,
}

impl MarketHandle {
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub fn snapshot(&self) -> Arc<MarketSnapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, snapshot: MarketSnapshot) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(snapshot);
    }
}

impl Default for MarketHandle {
    fn default() -> Self {
        Self::new(MarketSnapshot::defaults())
    }
}

// ── Market sources ──────────────────────────────────────────────────

/// Anything that can produce a full list of market records.
///
/// Implementations return raw records; validation happens when the feed
/// builds a snapshot from them.
#[cfg(feature = "full")]
#[async_trait::async_trait]
pub trait MarketSource: Send + Sync {
    /// Short name for logs (e.g. "static", "compound").
    fn name(&self) -> &str;

    async fn fetch_markets(&self) -> anyhow::Result<Vec<AssetMarket>>;
}

/// Serves a fixed table. Defaults to the built-in four markets.
#[derive(Debug, Clone)]
pub struct StaticMarketSource {
    markets: Vec<AssetMarket>,
}

impl StaticMarketSource {
    pub fn new(markets: Vec<AssetMarket>) -> Self {
        Self { markets }
    }

    pub fn markets(&self) -> &[AssetMarket] {
        &self.markets
    }
}

impl Default for StaticMarketSource {
    fn default() -> Self {
        Self::new(MarketSnapshot::defaults().markets().to_vec())
    }
}

#[cfg(feature = "full")]
#[async_trait::async_trait]
impl MarketSource for StaticMarketSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_markets(&self) -> anyhow::Result<Vec<AssetMarket>> {
        Ok(self.markets.clone())
    }
}
