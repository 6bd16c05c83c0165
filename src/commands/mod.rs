pub mod learn;
pub mod markets;
pub mod profile;
pub mod sandbox;
pub mod schema;
pub mod strategy;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use learnfi::config::{AppConfig, ConfigOverrides, MarketSourceKind};
use learnfi::content::ContentSelector;
use learnfi::engine::AppState;
use learnfi::market::compound::CompoundSource;
use learnfi::market::feed::{MarketFeed, RefreshOutcome};
use learnfi::market::{MarketHandle, MarketSource, StaticMarketSource};
use learnfi::model::PositionLedger;
use learnfi::store::{JsonFileStore, POSITION_LEDGER_KEY};

use crate::cli::GlobalArgs;

pub fn config(global: &GlobalArgs) -> Result<AppConfig> {
    AppConfig::from_overrides(&ConfigOverrides {
        store_path: global.store.clone(),
        source: global.source.clone(),
        markets_url: global.markets_url.clone(),
        refresh_secs: global.refresh_secs,
    })
}

/// Feed for the configured market source, writing into a fresh handle
/// seeded with the built-in table.
pub fn market_feed(config: &AppConfig) -> Result<MarketFeed> {
    let source: Arc<dyn MarketSource> = match &config.market_source {
        MarketSourceKind::Static => Arc::new(StaticMarketSource::default()),
        MarketSourceKind::Compound { url } => Arc::new(CompoundSource::new(url.as_str(), config.request_timeout)?),
    };
    Ok(MarketFeed::new(source, MarketHandle::default()))
}

/// Current markets: one refresh from a live source, or the built-in table.
pub fn load_markets(config: &AppConfig) -> Result<MarketHandle> {
    if config.market_source == MarketSourceKind::Static {
        return Ok(MarketHandle::default());
    }
    let feed = market_feed(config)?;
    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    if let RefreshOutcome::Retained { .. } = rt.block_on(feed.refresh()) {
        eprintln!("Live market data unavailable; using built-in rates.");
    }
    Ok(feed.handle().clone())
}

/// A learner session backed by the session file.
pub struct Session {
    pub store: JsonFileStore,
    pub state: AppState,
}

impl Session {
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let config = config(global)?;
        let markets = load_markets(&config)?;
        let store = JsonFileStore::new(&config.store_path);
        info!(path = %store.path().display(), "opening session");

        let ledger = match store.get::<PositionLedger>(POSITION_LEDGER_KEY) {
            Ok(ledger) => ledger.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "saved position unreadable; starting empty");
                PositionLedger::default()
            }
        };

        let content = ContentSelector::with_defaults().context("loading lesson content")?;
        let state = AppState::new(markets, content, Box::new(store.clone())).with_ledger(ledger);
        Ok(Session { store, state })
    }

    /// The profile saves itself on change; the position is saved here.
    pub fn save_position(&self) -> Result<()> {
        self.store
            .put(POSITION_LEDGER_KEY, self.state.ledger())
            .with_context(|| format!("saving position to {}", self.store.path().display()))
    }
}
