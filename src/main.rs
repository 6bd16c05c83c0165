use clap::Parser;

mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    learnfi::logging::init();
    let cli = cli::Cli::parse();
    let global = cli.global;

    match cli.command {
        cli::Command::Schema => commands::schema::run(),
        cli::Command::Strategy {
            risk,
            goal,
            horizon,
        } => commands::strategy::run(&global, risk, goal, horizon),
        cli::Command::Markets => commands::markets::run(&global),
        cli::Command::Watch { ticks } => commands::markets::watch(&global, ticks),
        cli::Command::Supply { symbol, amount } => {
            commands::sandbox::supply(&global, &symbol, &amount)
        }
        cli::Command::Borrow { symbol, amount } => {
            commands::sandbox::borrow(&global, &symbol, &amount)
        }
        cli::Command::Position => commands::sandbox::position(&global),
        cli::Command::Explain {
            concept,
            difficulty,
        } => commands::learn::explain(&global, &concept, difficulty),
        cli::Command::Quiz { concept } => commands::learn::quiz(&global, &concept),
        cli::Command::Answer {
            topic,
            choice,
            question,
        } => commands::learn::answer(&global, &topic, question, choice),
        cli::Command::Profile { username } => commands::profile::show(&global, username.as_deref()),
        cli::Command::Reset => commands::profile::reset(&global),
    }
}
