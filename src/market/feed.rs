use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{MarketHandle, MarketSource};
use crate::model::MarketSnapshot;

/// What a refresh did to the shared snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The snapshot was swapped for a freshly fetched one.
    Replaced { assets: usize },
    /// The fetch failed or returned invalid data; the previous snapshot stays.
    Retained { reason: String },
}

impl RefreshOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, RefreshOutcome::Replaced { .. })
    }
}

/// Pulls markets from a source into a shared [`MarketHandle`].
pub struct MarketFeed {
    source: Arc<dyn MarketSource>,
    handle: MarketHandle,
}

impl MarketFeed {
    pub fn new(source: Arc<dyn MarketSource>, handle: MarketHandle) -> Self {
        Self { source, handle }
    }

    pub fn handle(&self) -> &MarketHandle {
        &self.handle
    }

    /// Fetch once. On any failure the current snapshot is kept (stale but valid).
    pub async fn refresh(&self) -> RefreshOutcome {
        let markets = match self.source.fetch_markets().await {
            Ok(markets) => markets,
            Err(e) => {
                warn!(source = self.source.name(), error = %format!("{e:#}"), "market refresh failed; keeping previous snapshot");
                return RefreshOutcome::Retained {
                    reason: format!("{e:#}"),
                };
            }
        };

        match MarketSnapshot::new(markets) {
            Ok(snapshot) => {
                let assets = snapshot.len();
                self.handle.replace(snapshot);
                debug!(source = self.source.name(), assets, "market snapshot replaced");
                RefreshOutcome::Replaced { assets }
            }
            Err(errors) => {
                let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                let reason = msgs.join("; ");
                warn!(source = self.source.name(), %reason, "rejected invalid market data; keeping previous snapshot");
                RefreshOutcome::Retained { reason }
            }
        }
    }

    /// Refresh immediately, then every `interval`, until the returned task is
    /// stopped or dropped.
    pub fn spawn(self, interval: Duration) -> RefreshTask {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let (outcome_tx, outcome_rx) = watch::channel(None);

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let outcome = self.refresh().await;
                        let _ = outcome_tx.send(Some(outcome));
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            info!(source = self.source.name(), "market refresh stopped");
        });

        RefreshTask {
            stop: stop_tx,
            outcomes: outcome_rx,
            join: Some(join),
        }
    }
}

/// Handle to a running periodic refresh. Dropping it stops the timer; an
/// in-flight fetch is abandoned.
pub struct RefreshTask {
    stop: watch::Sender<bool>,
    outcomes: watch::Receiver<Option<RefreshOutcome>>,
    join: Option<JoinHandle<()>>,
}

impl RefreshTask {
    /// Wait for the next completed refresh. Returns `None` once the task has ended.
    pub async fn next_outcome(&mut self) -> Option<RefreshOutcome> {
        self.outcomes.changed().await.ok()?;
        self.outcomes.borrow_and_update().clone()
    }

    /// Stop the timer and wait for the task to finish.
    pub async fn stop(mut self) {
        let _ = self.stop.send(true);
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}
