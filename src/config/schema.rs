//! Configuration schema definitions.
//!
//! Defines the structure of the configuration file using serde. Defaults
//! mirror the built-in port settings, so an absent file changes nothing.

use crate::settings::{self, PortSettings};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial port configuration
    pub serial: SerialSection,
    /// Logging configuration
    pub logging: LoggingSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

/// Serial port configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSection {
    /// Device path
    pub device: PathBuf,
    /// Baud rate
    pub baud: u32,
    /// Read deadline in seconds
    pub timeout_secs: u64,
    /// Back-off between quiet polls, in milliseconds
    pub poll_interval_ms: u64,
    /// stty mode strings
    pub stty: SttySection,
}

impl Default for SerialSection {
    fn default() -> Self {
        Self {
            device: PathBuf::from(settings::DEFAULT_DEVICE),
            baud: settings::DEFAULT_BAUD_RATE,
            timeout_secs: settings::DEFAULT_TIMEOUT.as_secs(),
            poll_interval_ms: settings::DEFAULT_POLL_INTERVAL.as_millis() as u64,
            stty: SttySection::default(),
        }
    }
}

impl SerialSection {
    /// Build runtime port settings from this section.
    pub fn to_port_settings(&self) -> PortSettings {
        PortSettings::builder()
            .device(&self.device)
            .baud_rate(self.baud)
            .timeout(Duration::from_secs(self.timeout_secs))
            .poll_interval(Duration::from_millis(self.poll_interval_ms))
            .special_settings(self.stty.special.clone())
            .control_settings(self.stty.control.clone())
            .input_settings(self.stty.input.clone())
            .output_settings(self.stty.output.clone())
            .local_settings(self.stty.local.clone())
            .combination_settings(self.stty.combination.clone())
            .build()
    }
}

/// stty mode strings, one field per setting category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttySection {
    pub special: String,
    pub control: String,
    pub input: String,
    pub output: String,
    pub local: String,
    pub combination: String,
}

impl Default for SttySection {
    fn default() -> Self {
        let defaults = PortSettings::default();
        Self {
            special: defaults.special,
            control: defaults.control,
            input: defaults.input,
            output: defaults.output,
            local: defaults.local,
            combination: defaults.combination,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
