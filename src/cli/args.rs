//! CLI argument parsing using clap.
//!
//! Contains the Cli struct and the Commands enum.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

use crate::config::ROOT_ENV_VAR;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Settings file synchronizer
#[derive(Parser, Debug)]
#[command(
    name = "vault-sync",
    version = env!("CARGO_PKG_VERSION"),
    about = "Keep same-named settings files in sync across project directories",
    long_about = "Watches every file directly inside a marker directory (.obsidian by default) \
                  under the root and copies each change to all files with the same name.",
    after_help = "Examples:\n  OBSIDIAN_VAULTS=~/vaults vault-sync\n  vault-sync --root ~/vaults index --json\n  vault-sync --config ./settings.toml config",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Root directory to scan (overrides config)
    #[arg(short, long, global = true, env = ROOT_ENV_VAR)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Watch and synchronize (default)
    #[command(about = "Index the root and propagate changes until terminated")]
    Watch,

    /// Show what would be synchronized
    #[command(about = "Build the index without watching and print it")]
    Index {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings")]
    Config,
}

impl Cli {
    /// The command to run; watching when none was given.
    pub fn resolved_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Watch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_watch() {
        let cli = Cli::try_parse_from(["vault-sync", "--root", "/srv/vaults"]).unwrap();
        assert_eq!(cli.resolved_command(), Commands::Watch);
        assert_eq!(cli.root, Some(PathBuf::from("/srv/vaults")));
    }

    #[test]
    fn test_index_json_with_global_options() {
        let cli = Cli::try_parse_from([
            "vault-sync",
            "index",
            "--json",
            "--config",
            "/etc/vault-sync.toml",
        ])
        .unwrap();

        assert_eq!(cli.resolved_command(), Commands::Index { json: true });
        assert_eq!(cli.config, Some(PathBuf::from("/etc/vault-sync.toml")));
    }

    #[test]
    fn test_cli_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
