//! Port settings and the stty argument rendering.
//!
//! `PortSettings` is an immutable value object: everything the port needs is
//! fixed when the builder finishes, so line settings cannot drift after the
//! device has been configured.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Conventional device path on boards with an on-header UART.
pub const DEFAULT_DEVICE: &str = "/dev/ttyAMA0";

/// Default communication speed in baud.
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

/// Default bound on a single read call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default back-off between polls while the line is quiet.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Immutable serial port settings.
///
/// The six mode strings map to stty's setting categories and are passed to
/// the tool verbatim (whitespace-split). The defaults configure a raw 8N1
/// line with echo off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSettings {
    /// Filesystem path of the character device.
    pub device: PathBuf,
    /// Communication speed, rendered as `ispeed <baud> ospeed <baud>`.
    pub baud_rate: u32,
    /// Bound on a single read call.
    pub timeout: Duration,
    /// Back-off slept after each quiet poll.
    pub poll_interval: Duration,
    /// stty special settings.
    pub special: String,
    /// stty control settings.
    pub control: String,
    /// stty input settings.
    pub input: String,
    /// stty output settings.
    pub output: String,
    /// stty local settings.
    pub local: String,
    /// stty combination settings.
    pub combination: String,
}

impl Default for PortSettings {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEFAULT_DEVICE),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            special: String::new(),
            control: "cs8 -cread -parenb".to_string(),
            input: "-ignpar -cstopb -iutf8".to_string(),
            output: String::new(),
            local: "-echo".to_string(),
            combination: "raw".to_string(),
        }
    }
}

impl PortSettings {
    /// Start building settings from the defaults.
    pub fn builder() -> PortSettingsBuilder {
        PortSettingsBuilder::default()
    }

    /// Render the full stty argument list for this configuration.
    ///
    /// Produces `-F <device> <combination> ispeed <baud> ospeed <baud>
    /// <special> <control> <input> <output> <local>` as separate arguments.
    /// Mode strings are whitespace-split; empty ones contribute no
    /// arguments.
    pub fn stty_args(&self) -> Vec<String> {
        let mut args = vec!["-F".to_string(), self.device.display().to_string()];
        push_modes(&mut args, &self.combination);
        args.push("ispeed".to_string());
        args.push(self.baud_rate.to_string());
        args.push("ospeed".to_string());
        args.push(self.baud_rate.to_string());
        push_modes(&mut args, &self.special);
        push_modes(&mut args, &self.control);
        push_modes(&mut args, &self.input);
        push_modes(&mut args, &self.output);
        push_modes(&mut args, &self.local);
        args
    }
}

fn push_modes(args: &mut Vec<String>, modes: &str) {
    args.extend(modes.split_whitespace().map(str::to_string));
}

/// Builder for `PortSettings`.
#[derive(Debug, Clone, Default)]
pub struct PortSettingsBuilder {
    settings: PortSettings,
}

impl PortSettingsBuilder {
    /// Set the device path.
    pub fn device(mut self, device: impl AsRef<Path>) -> Self {
        self.settings.device = device.as_ref().to_path_buf();
        self
    }

    /// Set the baud rate.
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.settings.baud_rate = baud_rate;
        self
    }

    /// Set the bound on a single read call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Set the back-off between quiet polls.
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.settings.poll_interval = poll_interval;
        self
    }

    /// Set the stty special settings.
    pub fn special_settings(mut self, modes: impl Into<String>) -> Self {
        self.settings.special = modes.into();
        self
    }

    /// Set the stty control settings.
    pub fn control_settings(mut self, modes: impl Into<String>) -> Self {
        self.settings.control = modes.into();
        self
    }

    /// Set the stty input settings.
    pub fn input_settings(mut self, modes: impl Into<String>) -> Self {
        self.settings.input = modes.into();
        self
    }

    /// Set the stty output settings.
    pub fn output_settings(mut self, modes: impl Into<String>) -> Self {
        self.settings.output = modes.into();
        self
    }

    /// Set the stty local settings.
    pub fn local_settings(mut self, modes: impl Into<String>) -> Self {
        self.settings.local = modes.into();
        self
    }

    /// Set the stty combination settings.
    pub fn combination_settings(mut self, modes: impl Into<String>) -> Self {
        self.settings.combination = modes.into();
        self
    }

    /// Finish building.
    pub fn build(self) -> PortSettings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_settings() {
        let settings = PortSettings::default();
        assert_eq!(settings.device, PathBuf::from("/dev/ttyAMA0"));
        assert_eq!(settings.baud_rate, 57_600);
        assert_eq!(settings.timeout, Duration::from_secs(15));
        assert_eq!(settings.special, "");
        assert_eq!(settings.control, "cs8 -cread -parenb");
        assert_eq!(settings.input, "-ignpar -cstopb -iutf8");
        assert_eq!(settings.output, "");
        assert_eq!(settings.local, "-echo");
        assert_eq!(settings.combination, "raw");
    }

    #[test]
    fn test_stty_args_order() {
        let settings = PortSettings::builder()
            .device("/dev/ttyUSB1")
            .baud_rate(9_600)
            .build();

        assert_eq!(
            settings.stty_args(),
            vec![
                "-F",
                "/dev/ttyUSB1",
                "raw",
                "ispeed",
                "9600",
                "ospeed",
                "9600",
                "cs8",
                "-cread",
                "-parenb",
                "-ignpar",
                "-cstopb",
                "-iutf8",
                "-echo",
            ]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_empty_mode_strings_contribute_no_args() {
        let settings = PortSettings::builder()
            .special_settings("")
            .control_settings("")
            .input_settings("")
            .output_settings("")
            .local_settings("")
            .combination_settings("")
            .build();

        assert_eq!(
            settings.stty_args(),
            vec!["-F", "/dev/ttyAMA0", "ispeed", "57600", "ospeed", "57600"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_builder_overrides() {
        let settings = PortSettings::builder()
            .baud_rate(115_200)
            .timeout(Duration::from_secs(2))
            .local_settings("echo")
            .build();

        assert_eq!(settings.baud_rate, 115_200);
        assert_eq!(settings.timeout, Duration::from_secs(2));
        assert_eq!(settings.local, "echo");
        // untouched fields keep their defaults
        assert_eq!(settings.combination, "raw");
    }
}
