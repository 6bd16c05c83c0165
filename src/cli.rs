use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use learnfi::model::Difficulty;
use learnfi::strategy::{InvestmentGoal, RiskTolerance, TimeHorizon};

/// LearnFi: learn DeFi lending with a simulated supply/borrow sandbox,
/// lessons, quizzes and badges.
#[derive(Parser)]
#[command(name = "learnfi", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Session file (default: $LEARNFI_STORE or ~/.learnfi/profile.json)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Market data source: static (default) or compound
    #[arg(long, global = true)]
    pub source: Option<String>,

    /// Endpoint for the compound source (default: $LEARNFI_MARKETS_URL)
    #[arg(long, global = true)]
    pub markets_url: Option<String>,

    /// Seconds between market refreshes
    #[arg(long, global = true)]
    pub refresh_secs: Option<u64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the current market table
    Markets,

    /// Supply an asset to the simulated market
    Supply {
        /// Asset symbol, e.g. DAI
        symbol: String,
        /// Amount of the asset
        amount: String,
    },

    /// Borrow an asset against supplied collateral
    Borrow {
        /// Asset symbol, e.g. USDC
        symbol: String,
        /// Amount of the asset
        amount: String,
    },

    /// Show the simulated position, borrow limit and health factor
    Position,

    /// Explain a topic or concept
    Explain {
        /// Topic id, topic title or any DeFi term
        concept: String,

        /// beginner (default), intermediate or advanced
        #[arg(long, default_value = "beginner")]
        difficulty: Difficulty,
    },

    /// Ask a quiz question about a topic or concept
    Quiz {
        /// Topic id, topic title or any DeFi term
        concept: String,
    },

    /// Answer a quiz question for a topic
    Answer {
        /// Topic id (ctoken, apy, collateral, liquidation, interest, governance)
        topic: String,

        /// Chosen option, numbered from 1
        choice: usize,

        /// Question number printed by `quiz`
        #[arg(long)]
        question: usize,
    },

    /// Show level, experience, badges and progress
    Profile {
        /// Set the display name
        #[arg(long)]
        username: Option<String>,
    },

    /// Forget all progress and the simulated position
    Reset,

    /// Suggest a lending strategy from current market rates
    Strategy {
        #[arg(long, value_enum, default_value = "medium")]
        risk: RiskTolerance,

        #[arg(long, value_enum, default_value = "income")]
        goal: InvestmentGoal,

        #[arg(long, value_enum, default_value = "medium")]
        horizon: TimeHorizon,
    },

    /// Output the JSON schema for the saved profile
    Schema,

    /// Refresh markets periodically and print each snapshot
    Watch {
        /// Stop after this many refreshes (default: run until Ctrl-C)
        #[arg(long)]
        ticks: Option<u32>,
    },
}
