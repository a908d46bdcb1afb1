//! Configuration module for quietport.
//!
//! TOML-based configuration with environment variable overrides, used by
//! the CLI to pick device, speed, timeout, and stty mode strings.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of
//! priority):
//!
//! 1. `QUIETPORT_CONFIG` environment variable (explicit path)
//! 2. `./quietport.toml` (current directory)
//! 3. `~/.config/quietport/quietport.toml`
//! 4. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! - `QUIETPORT_SERIAL_DEVICE`
//! - `QUIETPORT_SERIAL_BAUD`
//! - `QUIETPORT_SERIAL_TIMEOUT_SECS`
//! - `QUIETPORT_SERIAL_POLL_INTERVAL_MS`
//! - `QUIETPORT_LOG_LEVEL`
//!
//! # Example
//!
//! ```rust,ignore
//! use quietport::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load()?;
//! let settings = loader.config().serial.to_port_settings();
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{resolve_config_path, ConfigLoader};
pub use schema::{Config, LoggingSection, SerialSection, SttySection};
