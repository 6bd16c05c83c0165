use anyhow::{Result, bail};

use learnfi::engine::{ActionOutcome, position};
use learnfi::model::ledger::MAX_BORROW_RATIO;

use super::Session;
use crate::cli::GlobalArgs;

pub fn supply(global: &GlobalArgs, symbol: &str, amount: &str) -> Result<()> {
    let mut session = Session::open(global)?;
    let symbol = symbol.to_uppercase();
    let outcome = match position::parse_order(&session.state.markets(), &symbol, amount) {
        Ok(amount) => session.state.simulate_supply(&symbol, amount),
        Err(e) => ActionOutcome::failure(&e),
    };
    finish(&session, outcome, &symbol)
}

pub fn borrow(global: &GlobalArgs, symbol: &str, amount: &str) -> Result<()> {
    let mut session = Session::open(global)?;
    let symbol = symbol.to_uppercase();
    let outcome = match position::parse_order(&session.state.markets(), &symbol, amount) {
        Ok(amount) => session.state.simulate_borrow(&symbol, amount),
        Err(e) => ActionOutcome::failure(&e),
    };
    finish(&session, outcome, &symbol)
}

fn finish(session: &Session, outcome: ActionOutcome, symbol: &str) -> Result<()> {
    if !outcome.success {
        bail!("{}", outcome.message);
    }
    session.save_position()?;

    println!("{}", outcome.message);
    if let Some(derived) = outcome.derived_amount {
        println!("  received {derived:.4} c{}", symbol.to_uppercase());
    }
    println!(
        "  health factor {:.1}%  (+{} XP)",
        session.state.ledger().health_factor_percent(),
        learnfi::engine::progression::SIMULATION_XP
    );
    Ok(())
}

pub fn position(global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let ledger = session.state.ledger();
    let markets = session.state.markets();

    if ledger.is_empty() {
        println!("No simulated position yet. Try `learnfi supply DAI 100`.");
        return Ok(());
    }

    println!("Supplied");
    for (symbol, amount) in ledger.supplied_assets() {
        println!(
            "  {symbol:<6} {amount:>14.6}  earning {:.2}% APY",
            position::supply_apy(&markets, symbol)
        );
    }
    println!("Borrowed");
    if ledger.borrowed_assets().is_empty() {
        println!("  (nothing)");
    }
    for (symbol, amount) in ledger.borrowed_assets() {
        println!(
            "  {symbol:<6} {amount:>14.6}  paying {:.2}% APY",
            position::borrow_apy(&markets, symbol)
        );
    }

    let borrowed_usd = ledger.borrowed_value_usd(&markets);
    let limit = ledger.borrow_limit_usd();
    println!();
    println!("Collateral value   ${:.2}", ledger.collateral_value_usd());
    println!(
        "Borrow limit       ${limit:.2}  ({:.0}% of collateral)",
        MAX_BORROW_RATIO * 100.0
    );
    println!("Borrowed value     ${borrowed_usd:.2}");
    println!("Available to borrow ${:.2}", (limit - borrowed_usd).max(0.0));
    println!("Health factor      {:.1}%", ledger.health_factor_percent());
    Ok(())
}
