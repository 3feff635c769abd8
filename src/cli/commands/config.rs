//! Config command.

use crate::config::Settings;

/// Run config command - display current configuration.
pub fn run(settings: &Settings) -> anyhow::Result<()> {
    println!("Current Configuration:");
    println!("{}", "=".repeat(50));
    println!("{}", toml::to_string_pretty(settings)?);
    Ok(())
}
