//! `nd seed` command implementation.

use std::path::PathBuf;

use clap::Args;
use nd_config::{CliSettings, Config};
use nd_seed::{CLUSTER_DESCRIBE_PATH, SeedServer, run_server, server_config_from_nd_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the seed command.
#[derive(Args)]
pub(crate) struct SeedArgs {
    /// Path to configuration file (default: auto-discover nd.toml).
    #[arg(short, long, env = "ND_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SeedArgs {
    /// Execute the seed command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the port is taken.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let status = Output::new();
        let banner = Output::stdout();

        let cli_settings = CliSettings {
            seed_host: self.host,
            seed_port: self.port,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        run_server(server_config_from_nd_config(&config), |server: &SeedServer| {
            if let Ok(addr) = server.local_addr() {
                status.success(&format!("Seed provider listening on {addr}"));
            }
            banner.info(&serving_banner(server.body()));
        })
        .await?;
        Ok(())
    }
}

/// Startup line printed to stdout once the listener is bound.
fn serving_banner(payload: &str) -> String {
    format!("Serving: {CLUSTER_DESCRIBE_PATH} -> {payload}")
}
