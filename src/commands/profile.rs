use anyhow::Result;

use super::Session;
use crate::cli::GlobalArgs;

pub fn show(global: &GlobalArgs, username: Option<&str>) -> Result<()> {
    let mut session = Session::open(global)?;
    if let Some(name) = username {
        session.state.set_username(name);
    }

    let profile = session.state.profile();
    let name = if profile.username.is_empty() {
        "(anonymous)"
    } else {
        profile.username.as_str()
    };
    println!("{name}");
    println!(
        "Level {}  ·  {}/{} XP  ·  {:.0}% of lessons",
        profile.level,
        profile.experience,
        profile.level_threshold(),
        session.state.progress_percent()
    );

    if !profile.completed_topics.is_empty() {
        println!("\nCompleted topics");
        for topic in &profile.completed_topics {
            println!("  {}", topic.title());
        }
    }

    if !profile.badges.is_empty() {
        println!("\nBadges");
        for badge in &profile.badges {
            println!("  {}: {}", badge.name, badge.description);
        }
    }

    println!("\nWallet");
    for (symbol, amount) in &profile.balance {
        println!("  {symbol:<6} {amount}");
    }

    if !profile.simulation_history.is_empty() {
        println!("\nRecent simulations");
        for record in profile.simulation_history.iter().rev().take(5) {
            println!(
                "  {}  {:?} {} {}",
                record.timestamp.format("%Y-%m-%d %H:%M"),
                record.action,
                record.amount,
                record.symbol
            );
        }
    }
    Ok(())
}

pub fn reset(global: &GlobalArgs) -> Result<()> {
    let mut session = Session::open(global)?;
    session.state.reset();
    println!("Progress and simulated position cleared.");
    Ok(())
}
