use schemars::schema_for;

use learnfi::model::UserProfile;

/// Generate and print the JSON Schema for the saved `UserProfile`.
pub fn run() -> anyhow::Result<()> {
    let schema = schema_for!(UserProfile);
    let json = serde_json::to_string_pretty(&schema)?;
    println!("{json}");
    Ok(())
}
