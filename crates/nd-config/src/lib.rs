//! Configuration management for the NDBench dev tools.
//!
//! Parses `nd.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Every section is
//! optional; the defaults reproduce the stock seed stub and dev proxy setup
//! (port 8081, one `localhost` seed, `app/` served with `/REST/` proxied to
//! port 8080).
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `seed.host`
//! - `seed.nodes[*].*`
//! - `dev.host`
//! - `dev.rewrites[*]`

mod expand;

use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override seed server host.
    pub seed_host: Option<String>,
    /// Override seed server port.
    pub seed_port: Option<u16>,
    /// Override dev server host.
    pub dev_host: Option<String>,
    /// Override dev server port.
    pub dev_port: Option<u16>,
    /// Override watched directory.
    pub files: Option<PathBuf>,
    /// Override static asset root.
    pub base_dir: Option<PathBuf>,
    /// Replace the configured rewrite rules.
    pub rewrites: Option<Vec<String>>,
    /// Override browser opening.
    pub open_browser: Option<bool>,
    /// Override live reload enabled flag.
    pub live_reload_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "nd.toml";

/// Port shared by the seed stub and the dev server.
pub const DEFAULT_PORT: u16 = 8081;

/// Rewrite rule forwarding REST calls to a locally running NDBench backend.
pub const DEFAULT_REST_REWRITE: &str = "^/REST/(.*)$ http://localhost:8080/REST/$1 [P]";

/// Upper bound for `live_reload.debounce_ms`.
const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed stub server configuration.
    pub seed: SeedConfig,
    /// Dev server configuration (paths are relative strings from TOML).
    dev: DevConfigRaw,
    /// Live reload configuration.
    pub live_reload: LiveReloadConfig,

    /// Resolved dev server configuration (set after loading).
    #[serde(skip)]
    pub dev_resolved: DevConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Seed stub server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Records returned by `cluster_describe`, in order.
    pub nodes: Vec<SeedNode>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: DEFAULT_PORT,
            nodes: vec![SeedNode::default()],
        }
    }
}

/// One seed record as configured.
///
/// Fields left out of a `[[seed.nodes]]` table keep the single-node
/// localhost defaults, so overriding just the token is enough.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SeedNode {
    /// Ring token (decimal string).
    pub token: String,
    /// Host name of the node.
    pub hostname: String,
    /// Datacenter tag.
    pub dc: String,
    /// IPv4 address literal.
    pub ip: String,
    /// Availability zone.
    pub zone: String,
    /// Location (rack).
    pub location: String,
}

impl Default for SeedNode {
    fn default() -> Self {
        Self {
            token: "1383429731".to_owned(),
            hostname: "localhost".to_owned(),
            dc: "local-dc".to_owned(),
            ip: "127.0.0.1".to_owned(),
            zone: "us-east-1c".to_owned(),
            location: "us-east-1c".to_owned(),
        }
    }
}

/// Raw dev server configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize)]
#[serde(default)]
struct DevConfigRaw {
    host: String,
    port: u16,
    files: Option<String>,
    base_dir: Option<String>,
    log_prefix: String,
    open_browser: bool,
    rewrites: Vec<String>,
}

impl Default for DevConfigRaw {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: DEFAULT_PORT,
            files: None,
            base_dir: None,
            log_prefix: "NDBench UI - DEV".to_owned(),
            open_browser: true,
            rewrites: vec![DEFAULT_REST_REWRITE.to_owned()],
        }
    }
}

/// Resolved dev server configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DevConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory watched for live reload.
    pub files: PathBuf,
    /// Static asset root.
    pub base_dir: PathBuf,
    /// Prefix for startup messages.
    pub log_prefix: String,
    /// Open the system browser after startup.
    pub open_browser: bool,
    /// Rewrite rules in `<regex> <replacement> [FLAGS]` form.
    pub rewrites: Vec<String>,
}

/// Live reload configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LiveReloadConfig {
    /// Whether live reload is enabled.
    pub enabled: bool,
    /// File patterns to watch for changes.
    pub watch_patterns: Option<Vec<String>>,
    /// Quiet period before a change is broadcast.
    pub debounce_ms: u64,
}

impl Default for LiveReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            watch_patterns: None,
            debounce_ms: 100,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`seed.nodes[0].token`").
        field: String,
        /// Error message (e.g., "${`DYNO_TOKEN`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_port(port: u16, field: &str) -> Result<(), ConfigError> {
    // Port 0 would bind a random port nobody knows to point at
    if port == 0 {
        return Err(ConfigError::Validation(format!("{field} cannot be 0")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `nd.toml` in current directory and parents,
    /// falling back to defaults rooted at the current directory.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string.
    ///
    /// Relative paths resolve against `base`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.seed_host {
            self.seed.host.clone_from(host);
        }
        if let Some(port) = settings.seed_port {
            self.seed.port = port;
        }
        if let Some(host) = &settings.dev_host {
            self.dev_resolved.host.clone_from(host);
        }
        if let Some(port) = settings.dev_port {
            self.dev_resolved.port = port;
        }
        if let Some(files) = &settings.files {
            self.dev_resolved.files.clone_from(files);
        }
        if let Some(base_dir) = &settings.base_dir {
            self.dev_resolved.base_dir.clone_from(base_dir);
        }
        if let Some(rewrites) = &settings.rewrites {
            self.dev_resolved.rewrites.clone_from(rewrites);
        }
        if let Some(open_browser) = settings.open_browser {
            self.dev_resolved.open_browser = open_browser;
        }
        if let Some(live_reload_enabled) = settings.live_reload_enabled {
            self.live_reload.enabled = live_reload_enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            seed: SeedConfig::default(),
            dev: DevConfigRaw::default(),
            live_reload: LiveReloadConfig::default(),
            dev_resolved: DevConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_seed()?;
        self.validate_dev()?;
        self.validate_live_reload()?;
        Ok(())
    }

    fn validate_seed(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.seed.host, "seed.host")?;
        require_port(self.seed.port, "seed.port")?;

        for (i, node) in self.seed.nodes.iter().enumerate() {
            let field = |name: &str| format!("seed.nodes[{i}].{name}");

            require_non_empty(&node.token, &field("token"))?;
            if !node.token.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ConfigError::Validation(format!(
                    "{} must be a decimal number, got {:?}",
                    field("token"),
                    node.token
                )));
            }
            require_non_empty(&node.hostname, &field("hostname"))?;
            require_non_empty(&node.dc, &field("dc"))?;
            if node.ip.parse::<Ipv4Addr>().is_err() {
                return Err(ConfigError::Validation(format!(
                    "{} must be an IPv4 address, got {:?}",
                    field("ip"),
                    node.ip
                )));
            }
        }

        Ok(())
    }

    fn validate_dev(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.dev_resolved.host, "dev.host")?;
        require_port(self.dev_resolved.port, "dev.port")?;
        for (i, rule) in self.dev_resolved.rewrites.iter().enumerate() {
            require_non_empty(rule.trim(), &format!("dev.rewrites[{i}]"))?;
        }
        Ok(())
    }

    fn validate_live_reload(&self) -> Result<(), ConfigError> {
        if self.live_reload.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::Validation(format!(
                "live_reload.debounce_ms cannot exceed {MAX_DEBOUNCE_MS}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.seed.host = expand::expand_env(&self.seed.host, "seed.host")?;

        for (i, node) in self.seed.nodes.iter_mut().enumerate() {
            let prefix = format!("seed.nodes[{i}]");
            for (name, value) in [
                ("token", &mut node.token),
                ("hostname", &mut node.hostname),
                ("dc", &mut node.dc),
                ("ip", &mut node.ip),
                ("zone", &mut node.zone),
                ("location", &mut node.location),
            ] {
                *value = expand::expand_env(value, &format!("{prefix}.{name}"))?;
            }
        }

        self.dev.host = expand::expand_env(&self.dev.host, "dev.host")?;
        expand::expand_env_all(&mut self.dev.rewrites, "dev.rewrites")?;

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.dev_resolved = DevConfig {
            host: self.dev.host.clone(),
            port: self.dev.port,
            files: resolve(self.dev.files.as_deref(), "app"),
            base_dir: resolve(self.dev.base_dir.as_deref(), "app"),
            log_prefix: self.dev.log_prefix.clone(),
            open_browser: self.dev.open_browser,
            rewrites: self.dev.rewrites.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/work"));
        assert_eq!(config.seed.host, "0.0.0.0");
        assert_eq!(config.seed.port, 8081);
        assert_eq!(config.seed.nodes, vec![SeedNode::default()]);
        assert_eq!(config.dev_resolved.port, 8081);
        assert_eq!(config.dev_resolved.files, PathBuf::from("/work/app"));
        assert_eq!(config.dev_resolved.base_dir, PathBuf::from("/work/app"));
        assert_eq!(config.dev_resolved.log_prefix, "NDBench UI - DEV");
        assert_eq!(
            config.dev_resolved.rewrites,
            vec![DEFAULT_REST_REWRITE.to_owned()]
        );
        assert!(config.dev_resolved.open_browser);
        assert!(config.live_reload.enabled);
        assert_eq!(config.live_reload.debounce_ms, 100);
        config.validate().unwrap();
    }

    #[test]
    fn test_default_seed_node() {
        let node = SeedNode::default();
        assert_eq!(node.token, "1383429731");
        assert_eq!(node.hostname, "localhost");
        assert_eq!(node.dc, "local-dc");
        assert_eq!(node.ip, "127.0.0.1");
        assert_eq!(node.zone, "us-east-1c");
        assert_eq!(node.location, "us-east-1c");
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = Config::from_toml_str("", Path::new("/cfg")).unwrap();
        assert_eq!(config.seed.nodes.len(), 1);
        assert_eq!(config.dev_resolved.files, PathBuf::from("/cfg/app"));
    }

    #[test]
    fn test_parse_seed_nodes_partial_override() {
        let toml = r#"
[seed]
port = 9091

[[seed.nodes]]
token = "100"

[[seed.nodes]]
token = "200"
hostname = "node-b"
ip = "10.0.0.2"
"#;
        let config = Config::from_toml_str(toml, Path::new("/cfg")).unwrap();
        assert_eq!(config.seed.port, 9091);
        assert_eq!(config.seed.host, "0.0.0.0");
        assert_eq!(config.seed.nodes.len(), 2);
        assert_eq!(config.seed.nodes[0].token, "100");
        assert_eq!(config.seed.nodes[0].hostname, "localhost");
        assert_eq!(config.seed.nodes[1].hostname, "node-b");
        assert_eq!(config.seed.nodes[1].ip, "10.0.0.2");
        assert_eq!(config.seed.nodes[1].dc, "local-dc");
    }

    #[test]
    fn test_parse_dev_config() {
        let toml = r#"
[dev]
port = 3000
files = "web"
base_dir = "web/dist"
log_prefix = "UI"
open_browser = false
rewrites = ["^/api/(.*)$ http://localhost:9000/$1 [P]"]

[live_reload]
enabled = false
watch_patterns = ["**/*.html", "**/*.js"]
debounce_ms = 250
"#;
        let config = Config::from_toml_str(toml, Path::new("/cfg")).unwrap();
        assert_eq!(config.dev_resolved.port, 3000);
        assert_eq!(config.dev_resolved.files, PathBuf::from("/cfg/web"));
        assert_eq!(config.dev_resolved.base_dir, PathBuf::from("/cfg/web/dist"));
        assert_eq!(config.dev_resolved.log_prefix, "UI");
        assert!(!config.dev_resolved.open_browser);
        assert_eq!(
            config.dev_resolved.rewrites,
            vec!["^/api/(.*)$ http://localhost:9000/$1 [P]".to_owned()]
        );
        assert!(!config.live_reload.enabled);
        assert_eq!(
            config.live_reload.watch_patterns,
            Some(vec!["**/*.html".to_owned(), "**/*.js".to_owned()])
        );
        assert_eq!(config.live_reload.debounce_ms, 250);
    }

    #[test]
    fn test_absolute_paths_kept() {
        let toml = "[dev]\nfiles = \"/srv/app\"\n";
        let config = Config::from_toml_str(toml, Path::new("/cfg")).unwrap();
        assert_eq!(config.dev_resolved.files, PathBuf::from("/srv/app"));
        assert_eq!(config.dev_resolved.base_dir, PathBuf::from("/cfg/app"));
    }

    #[test]
    fn test_unknown_field_type_is_parse_error() {
        let result = Config::from_toml_str("[seed]\nport = \"eighty\"\n", Path::new("/cfg"));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_non_numeric_token_rejected() {
        let toml = "[[seed.nodes]]\ntoken = \"abc\"\n";
        let err = Config::from_toml_str(toml, Path::new("/cfg")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("seed.nodes[0].token"));
    }

    #[test]
    fn test_invalid_ip_rejected() {
        let toml = "[[seed.nodes]]\nip = \"localhost\"\n";
        let err = Config::from_toml_str(toml, Path::new("/cfg")).unwrap_err();
        assert!(err.to_string().contains("seed.nodes[0].ip"));
        assert!(err.to_string().contains("IPv4"));
    }

    #[test]
    fn test_ipv6_rejected() {
        let toml = "[[seed.nodes]]\nip = \"::1\"\n";
        assert!(Config::from_toml_str(toml, Path::new("/cfg")).is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let err = Config::from_toml_str("[dev]\nport = 0\n", Path::new("/cfg")).unwrap_err();
        assert!(err.to_string().contains("dev.port cannot be 0"));
    }

    #[test]
    fn test_blank_rewrite_rejected() {
        let err =
            Config::from_toml_str("[dev]\nrewrites = [\"  \"]\n", Path::new("/cfg")).unwrap_err();
        assert!(err.to_string().contains("dev.rewrites[0]"));
    }

    #[test]
    fn test_debounce_limit() {
        let toml = "[live_reload]\ndebounce_ms = 60000\n";
        let err = Config::from_toml_str(toml, Path::new("/cfg")).unwrap_err();
        assert!(err.to_string().contains("debounce_ms"));
    }

    #[test]
    fn test_expand_env_vars_seed_token() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("ND_CONFIG_TEST_TOKEN", "987654321");
        }
        let toml = "[[seed.nodes]]\ntoken = \"${ND_CONFIG_TEST_TOKEN}\"\n";
        let config = Config::from_toml_str(toml, Path::new("/cfg")).unwrap();
        assert_eq!(config.seed.nodes[0].token, "987654321");
        unsafe {
            std::env::remove_var("ND_CONFIG_TEST_TOKEN");
        }
    }

    #[test]
    fn test_expand_env_vars_rewrite_with_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("ND_CONFIG_TEST_BACKEND");
        }
        let toml = r#"
[dev]
rewrites = ["^/REST/(.*)$ http://${ND_CONFIG_TEST_BACKEND:-localhost:8080}/REST/$1 [P]"]
"#;
        let config = Config::from_toml_str(toml, Path::new("/cfg")).unwrap();
        assert_eq!(config.dev_resolved.rewrites[0], DEFAULT_REST_REWRITE);
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("ND_CONFIG_TEST_MISSING_HOST");
        }
        let toml = "[seed]\nhost = \"${ND_CONFIG_TEST_MISSING_HOST}\"\n";
        let err = Config::from_toml_str(toml, Path::new("/cfg")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "seed.host"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/work"));
        let settings = CliSettings {
            seed_port: Some(9000),
            dev_host: Some("0.0.0.0".to_owned()),
            files: Some(PathBuf::from("/elsewhere")),
            rewrites: Some(vec!["^/x$ /y".to_owned()]),
            open_browser: Some(false),
            live_reload_enabled: Some(false),
            ..CliSettings::default()
        };
        config.apply_cli_settings(&settings);

        assert_eq!(config.seed.port, 9000);
        assert_eq!(config.seed.host, "0.0.0.0");
        assert_eq!(config.dev_resolved.host, "0.0.0.0");
        assert_eq!(config.dev_resolved.port, 8081);
        assert_eq!(config.dev_resolved.files, PathBuf::from("/elsewhere"));
        assert_eq!(config.dev_resolved.base_dir, PathBuf::from("/work/app"));
        assert_eq!(config.dev_resolved.rewrites, vec!["^/x$ /y".to_owned()]);
        assert!(!config.dev_resolved.open_browser);
        assert!(!config.live_reload.enabled);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.seed.port, 8081);
        assert_eq!(config.dev_resolved.host, "127.0.0.1");
        assert!(config.live_reload.enabled);
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/definitely/not/here/nd.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nd.toml");
        std::fs::write(&path, "[dev]\nbase_dir = \"public\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.dev_resolved.base_dir, dir.path().join("public"));
        assert_eq!(config.dev_resolved.files, dir.path().join("app"));
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_rejects_invalid_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nd.toml");
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            dev_port: Some(0),
            ..CliSettings::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
