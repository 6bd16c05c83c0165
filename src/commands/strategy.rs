use anyhow::Result;

use learnfi::strategy::{self, InvestmentGoal, RiskTolerance, StrategyParameters, TimeHorizon};

use crate::cli::GlobalArgs;

pub fn run(
    global: &GlobalArgs,
    risk: RiskTolerance,
    goal: InvestmentGoal,
    horizon: TimeHorizon,
) -> Result<()> {
    let config = super::config(global)?;
    let markets = super::load_markets(&config)?;
    let rec = strategy::recommend(
        &markets.snapshot(),
        StrategyParameters {
            risk_tolerance: risk,
            investment_goal: goal,
            time_horizon: horizon,
        },
    );

    println!("{}\n", rec.strategy);
    println!("{}\n", rec.explanation);
    println!("Steps");
    for (i, step) in rec.steps.iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }
    println!("\nRisks");
    for risk in &rec.risks {
        println!("  - {risk}");
    }
    println!("\nExpected returns: {}", rec.expected_returns);
    println!("\nSimulated guidance only, not financial advice.");
    Ok(())
}
