use anyhow::{Context, Result};

use learnfi::market::feed::RefreshOutcome;
use learnfi::model::MarketSnapshot;

use crate::cli::GlobalArgs;

pub fn run(global: &GlobalArgs) -> Result<()> {
    let config = super::config(global)?;
    let markets = super::load_markets(&config)?;
    print_table(&markets.snapshot());
    Ok(())
}

/// Refresh on the configured interval until Ctrl-C or `ticks` refreshes.
pub fn watch(global: &GlobalArgs, ticks: Option<u32>) -> Result<()> {
    let config = super::config(global)?;
    let feed = super::market_feed(&config)?;
    let handle = feed.handle().clone();

    let (stop_tx, mut stop_rx) = tokio::sync::watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(true);
    })
    .context("installing Ctrl-C handler")?;

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async move {
        let mut task = feed.spawn(config.refresh_interval);
        let mut seen = 0u32;
        println!(
            "Refreshing every {}s. Press Ctrl-C to stop.",
            config.refresh_interval.as_secs()
        );

        loop {
            tokio::select! {
                outcome = task.next_outcome() => {
                    let Some(outcome) = outcome else { break };
                    seen += 1;
                    match outcome {
                        RefreshOutcome::Replaced { assets } => {
                            println!("\n[{}] {assets} markets", chrono::Local::now().format("%H:%M:%S"));
                        }
                        RefreshOutcome::Retained { reason } => {
                            println!("\n[{}] refresh failed ({reason}); showing last good data",
                                chrono::Local::now().format("%H:%M:%S"));
                        }
                    }
                    print_table(&handle.snapshot());
                    if ticks.is_some_and(|limit| seen >= limit) {
                        break;
                    }
                }
                _ = stop_rx.changed() => break,
            }
        }

        task.stop().await;
    });
    Ok(())
}

pub fn print_table(snapshot: &MarketSnapshot) {
    if snapshot.is_empty() {
        println!("No markets available.");
        return;
    }
    println!(
        "{:<6} {:<22} {:>12} {:>11} {:>11} {:>10}",
        "Asset", "Name", "Price (USD)", "Supply APY", "Borrow APY", "Coll. F."
    );
    for m in snapshot.iter() {
        println!(
            "{:<6} {:<22} {:>12.2} {:>10.2}% {:>10.2}% {:>9.0}%",
            m.symbol,
            m.name,
            m.price_usd,
            m.supply_apy_percent,
            m.borrow_apy_percent,
            m.collateral_factor * 100.0
        );
    }
}
