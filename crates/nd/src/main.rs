//! nd CLI - NDBench local development tools.
//!
//! Provides commands for:
//! - `seed`: Serve a fixed Dynomite cluster description
//! - `dev`: Serve the UI with live reload and REST pass-through

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{DevArgs, SeedArgs};
use error::CliError;
use output::Output;

/// nd - NDBench local development tools.
#[derive(Parser)]
#[command(name = "nd", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a fixed cluster description for token-aware Dynomite clients.
    Seed(SeedArgs),
    /// Serve the UI with live reload, proxying REST calls to NDBench.
    Dev(DevArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Seed(args) => args.verbose,
            Self::Dev(args) => args.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = tokio::runtime::Runtime::new()
        .map_err(CliError::from)
        .and_then(|rt| {
            rt.block_on(async {
                match cli.command {
                    Commands::Seed(args) => args.execute().await,
                    Commands::Dev(args) => args.execute().await,
                }
            })
        });

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_is_per_subcommand() {
        let cli = Cli::try_parse_from(["nd", "seed", "--verbose"]).unwrap();
        assert!(cli.command.verbose());

        let cli = Cli::try_parse_from(["nd", "dev"]).unwrap();
        assert!(!cli.command.verbose());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["nd"]).is_err());
    }
}
