//! Layered application configuration.
//!
//! Sources, later ones winning: built-in defaults, the YAML file given with
//! `--config`, then `APP__`-prefixed environment variables (`__` separates
//! nesting levels, e.g. `APP__SERVER__PORT=9000`). Per-module sections live
//! in a free-form `modules` bag and are typed by the module that owns them.

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::home_dir::resolve_home_dir;

const ENV_PREFIX: &str = "APP__";
const HOME_SUBDIR: &str = ".blogify";

/// Root of the configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// Required unless the server runs with `--mock`.
    pub database: Option<DatabaseConfig>,
    /// Falls back to [`default_logging_config`] when absent.
    pub logging: Option<LoggingConfig>,
    /// Directory of `<module>.yaml` files merged into `modules`.
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// Module name to that module's raw settings.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base for relative paths (SQLite files, logs). Absolute after loading.
    pub home_dir: String,
    pub host: String,
    pub port: u16,
    /// Per-request timeout; `0` keeps the HTTP stack's default.
    #[serde(default)]
    pub timeout_sec: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `sqlite://path/to.db`, `sqlite::memory:` or `postgres://...`.
    pub url: String,
    pub max_conns: Option<u32>,
    pub busy_timeout_ms: Option<u32>,
}

/// Subsystem name to its logging section. The `default` key catches every
/// target not claimed by another key.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    /// `trace`, `debug`, `info`, `warn`, `error` or `off`.
    pub console_level: String,
    /// Log file path; empty disables file output.
    pub file: String,
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

/// Command line switches that feed into the configuration.
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub print_config: bool,
    pub verbose: u8,
    pub mock: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // empty selects $HOME/.blogify
            home_dir: String::new(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            timeout_sec: 0,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address '{}:{}'", self.host, self.port))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_sec > 0).then(|| Duration::from_secs(self.timeout_sec))
    }

    /// Replace `home_dir` with its absolute form, creating the directory.
    fn resolve_home(&mut self) -> Result<()> {
        let configured = Some(self.home_dir.trim())
            .filter(|h| !h.is_empty())
            .map(str::to_owned);
        let resolved = resolve_home_dir(configured, HOME_SUBDIR, true)
            .context("Failed to resolve server.home_dir")?;
        self.home_dir = resolved.to_string_lossy().into_owned();
        Ok(())
    }
}

pub fn default_logging_config() -> LoggingConfig {
    HashMap::from([(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/blogify.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    )])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: Some(DatabaseConfig {
                url: "sqlite://database/blogify.db".to_string(),
                max_conns: Some(10),
                busy_timeout_ms: Some(5000),
            }),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the YAML file at `config_path`, then the environment.
    ///
    /// Optional sections stay `None` unless the file or environment sets them.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        if !config_path.is_file() {
            bail!("config file not found: {}", config_path.display());
        }

        let skeleton = AppConfig {
            server: ServerConfig::default(),
            database: None,
            logging: None,
            modules_dir: None,
            modules: HashMap::new(),
        };
        let mut config: AppConfig = Figment::new()
            .merge(Serialized::defaults(skeleton))
            .merge(Yaml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        config.server.resolve_home()?;
        if let Some(dir) = config.modules_dir.as_deref() {
            for (module, raw) in read_module_dir(Path::new(dir))? {
                config.modules.insert(module, raw);
            }
        }
        Ok(config)
    }

    /// [`AppConfig::load_layered`] when a path is given, built-in defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut config = Self::default();
                config.server.resolve_home()?;
                Ok(config)
            }
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// `--port` replaces the configured port; each `-v` raises the default
    /// console level one step (debug, then trace).
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }

        let level = match args.verbose {
            0 => return,
            1 => "debug",
            _ => "trace",
        };
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(section) = logging.get_mut("default") {
            section.console_level = level.to_string();
        }
    }

    /// Typed module section; a missing or malformed section yields `T::default()`.
    pub fn module_config<T: DeserializeOwned + Default>(&self, module_name: &str) -> T {
        let Some(raw) = self.modules.get(module_name) else {
            return T::default();
        };
        serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
            tracing::warn!(module = module_name, error = %e, "invalid module config, using defaults");
            T::default()
        })
    }

    /// Typed module section; missing or malformed is an error.
    pub fn module_config_required<T: DeserializeOwned>(&self, module_name: &str) -> Result<T> {
        let raw = self
            .modules
            .get(module_name)
            .with_context(|| format!("missing module config: {module_name}"))?;
        serde_json::from_value(raw.clone())
            .with_context(|| format!("invalid {module_name} config"))
    }
}

/// `<name>.yaml` / `<name>.yml` files of `dir` keyed by file stem.
/// A missing directory contributes nothing.
fn read_module_dir(dir: &Path) -> Result<Vec<(String, serde_json::Value)>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut modules = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("cannot read modules_dir {}", dir.display()))?
    {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !path.is_file() || !is_yaml {
            continue;
        }

        let raw = std::fs::read_to_string(&path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid module file {}", path.display()))?;
        modules.push((name.to_string(), serde_json::to_value(value)?));
    }
    Ok(modules)
}
