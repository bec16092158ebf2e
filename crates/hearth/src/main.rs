// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hearth - quest rewards and daily bounties for household chores.
//!
//! This is the binary entry point.

mod admin;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hearth_config::{ConfigError, HearthConfig};

/// Hearth - quest rewards and daily bounties for household chores.
#[derive(Parser, Debug)]
#[command(name = "hearth", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Apply pending database migrations and exit.
    Migrate,
    /// Load and validate configuration, then print a summary.
    CheckConfig,
    /// Create a home and its first members.
    Bootstrap {
        /// Name of the new home.
        #[arg(long)]
        home: String,
        /// IANA timezone for the home (defaults to `home.default_timezone`).
        #[arg(long)]
        timezone: Option<String>,
        /// Username to add; repeat for several members.
        #[arg(long = "user", required = true)]
        users: Vec<String>,
    },
}

fn load_config(path: Option<&std::path::Path>) -> Result<HearthConfig, Vec<ConfigError>> {
    match path {
        Some(path) => hearth_config::load_and_validate_path(path),
        None => hearth_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            hearth_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Migrate) => {
            serve::init_tracing(&config.server.log_level);
            admin::run_migrate(&config).await
        }
        Some(Commands::CheckConfig) => {
            admin::print_config_summary(&config);
            Ok(())
        }
        Some(Commands::Bootstrap {
            home,
            timezone,
            users,
        }) => admin::run_bootstrap(&config, &home, timezone.as_deref(), &users)
            .await
            .map(|summary| println!("{summary}")),
        None => {
            println!("hearth: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bootstrap_with_several_users() {
        let cli = Cli::try_parse_from([
            "hearth",
            "bootstrap",
            "--home",
            "Burrow",
            "--user",
            "pip",
            "--user",
            "bramble",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Bootstrap { home, users, timezone }) => {
                assert_eq!(home, "Burrow");
                assert_eq!(users, vec!["pip", "bramble"]);
                assert!(timezone.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bootstrap_requires_a_user() {
        assert!(Cli::try_parse_from(["hearth", "bootstrap", "--home", "Burrow"]).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["hearth", "check-config", "--config", "/tmp/h.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/h.toml")));
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = hearth_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.server.port, 3000);
    }
}
