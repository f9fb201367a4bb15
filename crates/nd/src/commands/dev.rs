//! `nd dev` command implementation.

use std::path::PathBuf;

use clap::Args;
use nd_config::{CliSettings, Config};
use nd_dev::{DevServer, run_server, server_config_from_nd_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the dev command.
#[derive(Args)]
pub(crate) struct DevArgs {
    /// Path to configuration file (default: auto-discover nd.toml).
    #[arg(short, long, env = "ND_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory to watch for changes (overrides config).
    #[arg(long)]
    files: Option<PathBuf>,

    /// Directory to serve static files from (overrides config).
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Rewrite rule `<regex> <replacement> [FLAGS]`; repeat to add more.
    /// Replaces the configured rules.
    #[arg(long = "rewrite", value_name = "RULE")]
    rewrites: Vec<String>,

    /// Do not open a browser.
    #[arg(long)]
    no_open: bool,

    /// Enable live reload (default: enabled).
    #[arg(long)]
    live_reload: Option<bool>,

    /// Disable live reload.
    #[arg(long, conflicts_with = "live_reload")]
    no_live_reload: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl DevArgs {
    /// Execute the dev command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let output = Output::new().with_prefix(&config.dev_resolved.log_prefix);
        let dev = &config.dev_resolved;

        run_server(server_config_from_nd_config(&config), |server: &DevServer| {
            output.success(&format!("Serving files from: {}", dev.base_dir.display()));
            if let Ok(url) = server.url() {
                output.highlight(&format!("Local: {url}"));
            }
            for rule in &dev.rewrites {
                output.info(&format!("Rewrite: {rule}"));
            }
            if server.live_reload_enabled() {
                output.info(&format!("Watching files: {}", dev.files.display()));
            } else {
                output.warning("Live reload: disabled");
            }
        })
        .await?;
        Ok(())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            dev_host: self.host.clone(),
            dev_port: self.port,
            files: self.files.clone(),
            base_dir: self.base_dir.clone(),
            rewrites: (!self.rewrites.is_empty()).then(|| self.rewrites.clone()),
            open_browser: self.no_open.then_some(false),
            live_reload_enabled: self.resolve_live_reload_enabled(),
            ..CliSettings::default()
        }
    }

    /// Resolve `live_reload_enabled` from --live-reload/--no-live-reload flags.
    fn resolve_live_reload_enabled(&self) -> Option<bool> {
        self.no_live_reload.then_some(false).or(self.live_reload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: DevArgs,
    }

    fn parse(argv: &[&str]) -> DevArgs {
        let mut full = vec!["dev"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_no_flags_override_nothing() {
        let settings = parse(&[]).cli_settings();
        assert!(settings.dev_host.is_none());
        assert!(settings.dev_port.is_none());
        assert!(settings.rewrites.is_none());
        assert!(settings.open_browser.is_none());
        assert!(settings.live_reload_enabled.is_none());
    }

    #[test]
    fn test_rewrite_is_repeatable() {
        let settings = parse(&[
            "--rewrite",
            "^/REST/(.*)$ http://localhost:9090/REST/$1 [P]",
            "--rewrite",
            "^/legacy - [G]",
        ])
        .cli_settings();
        assert_eq!(
            settings.rewrites,
            Some(vec![
                "^/REST/(.*)$ http://localhost:9090/REST/$1 [P]".to_owned(),
                "^/legacy - [G]".to_owned(),
            ])
        );
    }

    #[test]
    fn test_no_open() {
        assert_eq!(parse(&["--no-open"]).cli_settings().open_browser, Some(false));
    }

    #[test]
    fn test_live_reload_flags() {
        assert_eq!(
            parse(&["--no-live-reload"]).resolve_live_reload_enabled(),
            Some(false)
        );
        assert_eq!(
            parse(&["--live-reload", "true"]).resolve_live_reload_enabled(),
            Some(true)
        );
        assert_eq!(parse(&[]).resolve_live_reload_enabled(), None);
    }

    #[test]
    fn test_live_reload_flags_conflict() {
        let result =
            Harness::try_parse_from(["dev", "--live-reload", "true", "--no-live-reload"]);
        assert!(result.is_err());
    }
}
