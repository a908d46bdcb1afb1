//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use std::path::{Path, PathBuf};

/// Config file name
const CONFIG_FILE_NAME: &str = "quietport.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "QUIETPORT_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `QUIETPORT_CONFIG` environment variable (explicit path)
    /// 2. `./quietport.toml` (current directory)
    /// 3. `~/.config/quietport/quietport.toml` (XDG on Linux/macOS)
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables can override any resolved value.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = if let Some(ref path) = config_path {
            load_from_file(path)?
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config)?;

        Ok(Self { config_path, config })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> ConfigResult<Self> {
        let mut config = Config::default();
        // Env overrides still apply on top of the defaults
        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path: None,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. XDG config directory
    if let Some(config_dir) = get_config_dir() {
        let app_config = config_dir.join("quietport").join(CONFIG_FILE_NAME);
        if app_config.exists() {
            return Some(app_config);
        }
    }

    // 4. No config file found - use defaults
    None
}

/// Get the platform-specific config directory.
fn get_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Apply environment variable overrides to a loaded configuration.
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    if let Ok(device) = std::env::var("QUIETPORT_SERIAL_DEVICE") {
        config.serial.device = PathBuf::from(device);
    }

    if let Ok(baud) = std::env::var("QUIETPORT_SERIAL_BAUD") {
        config.serial.baud = baud
            .parse()
            .map_err(|_| ConfigError::env_parse("QUIETPORT_SERIAL_BAUD", "expected an integer"))?;
    }

    if let Ok(secs) = std::env::var("QUIETPORT_SERIAL_TIMEOUT_SECS") {
        config.serial.timeout_secs = secs.parse().map_err(|_| {
            ConfigError::env_parse("QUIETPORT_SERIAL_TIMEOUT_SECS", "expected an integer")
        })?;
    }

    if let Ok(millis) = std::env::var("QUIETPORT_SERIAL_POLL_INTERVAL_MS") {
        config.serial.poll_interval_ms = millis.parse().map_err(|_| {
            ConfigError::env_parse("QUIETPORT_SERIAL_POLL_INTERVAL_MS", "expected an integer")
        })?;
    }

    if let Ok(level) = std::env::var("QUIETPORT_LOG_LEVEL") {
        config.logging.level = level;
    }

    Ok(())
}
