//! The serial port object: lazy open, settle-delayed writes, and the
//! quiet-period read loop.
//!
//! The port configures the device at most once per instance. The first
//! `read` or `write` call validates the device path and the stty tool,
//! applies the line settings, and opens the device non-blocking; failures
//! are recorded as per-attempt diagnostics and retried from scratch on the
//! next call. There is no close operation; the handle lives until the
//! process exits.

use crate::clock::Clock;
use crate::port::{SerialStream, StreamOpener};
use crate::settings::PortSettings;
use crate::stty::SttyRunner;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(unix)]
use crate::clock::SystemClock;
#[cfg(unix)]
use crate::port::SystemOpener;
#[cfg(unix)]
use crate::stty::SystemStty;

/// Settle delay after each write. Slow UART hardware needs this long to
/// drain its buffer before the caller moves on.
pub const WRITE_SETTLE: Duration = Duration::from_millis(100);

/// Keys for the per-attempt open diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Diagnostic {
    /// Device path missing or lacking read/write permission.
    Device,
    /// The stty helper could not be invoked.
    Stty,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device => write!(f, "device"),
            Self::Stty => write!(f, "stty"),
        }
    }
}

/// A serial device handle with quiet-period read termination.
///
/// Rather than reading a fixed number of bytes or up to a delimiter, `read`
/// watches for the line going quiet: every transition from "had data" to
/// "no data available" counts as one silence period, and the read stops
/// after a caller-chosen number of them.
///
/// # Example
/// ```no_run
/// use quietport::{PortSettings, SerialPort};
///
/// let settings = PortSettings::builder()
///     .device("/dev/ttyAMA0")
///     .baud_rate(57_600)
///     .build();
/// let mut port = SerialPort::new(settings);
///
/// port.write(b"AT\r\n");
/// let reply = port.read(1);
/// println!("{}", String::from_utf8_lossy(&reply));
/// ```
#[derive(Debug)]
pub struct SerialPort {
    settings: PortSettings,
    stty: Box<dyn SttyRunner>,
    opener: Box<dyn StreamOpener>,
    clock: Box<dyn Clock>,
    stream: Option<Box<dyn SerialStream>>,
    open: bool,
    last_errors: BTreeMap<Diagnostic, String>,
}

impl SerialPort {
    /// Create a port over the system backends (real device, real stty,
    /// real clock). The device is not touched until the first read or
    /// write.
    #[cfg(unix)]
    pub fn new(settings: PortSettings) -> Self {
        Self::with_backends(
            settings,
            Box::new(SystemStty),
            Box::new(SystemOpener),
            Box::new(SystemClock),
        )
    }

    /// Create a port with injected backends.
    pub fn with_backends(
        settings: PortSettings,
        stty: Box<dyn SttyRunner>,
        opener: Box<dyn StreamOpener>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            stty,
            opener,
            clock,
            stream: None,
            open: false,
            last_errors: BTreeMap::new(),
        }
    }

    /// Whether the device has been configured and opened.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The settings this port was built with.
    pub fn settings(&self) -> &PortSettings {
        &self.settings
    }

    /// Diagnostics recorded by the most recent failed open attempt.
    /// Empty whenever the port is open.
    pub fn last_errors(&self) -> &BTreeMap<Diagnostic, String> {
        &self.last_errors
    }

    /// Validate, configure, and open the device if that has not happened
    /// yet. Idempotent: once the port is open this is a no-op.
    ///
    /// Both checks always run, so a single failed attempt reports every
    /// problem at once. On failure the port stays closed, the diagnostics
    /// are kept in [`last_errors`](Self::last_errors), and their joined
    /// text is logged; the next read or write retries from scratch.
    pub fn ensure_open(&mut self) {
        if self.open {
            return;
        }
        self.last_errors.clear();

        let device = self.settings.device.clone();

        let device_ok = self.opener.accessible(&device);
        if !device_ok {
            self.last_errors.insert(
                Diagnostic::Device,
                format!(
                    "The device {} does not exist, is not readable or is not writable",
                    device.display()
                ),
            );
        }

        let stty_ok = match self.stty.probe() {
            Ok(()) => true,
            Err(e) => {
                self.last_errors.insert(Diagnostic::Stty, e.to_string());
                false
            }
        };

        if device_ok && stty_ok {
            let args = self.settings.stty_args();
            debug!(device = %device.display(), ?args, "applying line settings");
            if let Err(e) = self.stty.apply(&args) {
                // The line may still be usable with whatever settings stuck.
                warn!(device = %device.display(), error = %e, "stty reported failure, continuing");
            }

            match self.opener.open(&device) {
                Ok(stream) => {
                    self.stream = Some(stream);
                    self.open = true;
                    debug!(
                        device = %device.display(),
                        baud = self.settings.baud_rate,
                        "serial port open"
                    );
                }
                Err(e) => {
                    self.last_errors.insert(
                        Diagnostic::Device,
                        format!("Failed to open {}: {}", device.display(), e),
                    );
                }
            }
        }

        if !self.open {
            let joined = self
                .last_errors
                .values()
                .cloned()
                .collect::<Vec<_>>()
                .join(" and ");
            warn!(device = %device.display(), "{}", joined);
        }
    }

    /// Write bytes to the port, then wait the fixed settle delay.
    ///
    /// On a port that could not be opened this is a silent no-op; the open
    /// diagnostics have already been recorded. A write failure is logged
    /// and skips the settle delay.
    pub fn write(&mut self, message: &[u8]) {
        self.ensure_open();
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        if let Err(e) = stream.write_all(message) {
            warn!(error = %e, "write failed");
            return;
        }
        self.clock.sleep(WRITE_SETTLE);
    }

    /// Read until the line has gone quiet `block_threshold` times or the
    /// configured timeout elapses, whichever comes first.
    ///
    /// The stream is polled non-blocking, one byte at a time. A poll that
    /// finds no data is a *quiet* poll; each transition from data to quiet
    /// counts one silence period, so a run of consecutive quiet polls
    /// counts only once. After each quiet poll the loop backs off by the
    /// configured poll interval.
    ///
    /// A payload byte of 0x00 cannot be told apart from an idle line and
    /// counts as a quiet poll; devices that legitimately send NUL bytes
    /// need a higher `block_threshold`. Hitting the timeout returns
    /// whatever accumulated so far, it is not an error.
    pub fn read(&mut self, block_threshold: u32) -> Vec<u8> {
        self.ensure_open();
        let mut out = Vec::new();
        let deadline = self.clock.now() + self.settings.timeout;
        let Some(stream) = self.stream.as_mut() else {
            return out;
        };

        let mut quiet_runs = 0u32;
        let mut prev_quiet = true;
        let mut done = false;

        while !done && self.clock.now() < deadline {
            let byte = match stream.poll_byte() {
                Ok(byte) => byte,
                Err(e) => {
                    warn!(error = %e, "read failed, returning partial data");
                    break;
                }
            };

            let quiet = matches!(byte, None | Some(0));
            if quiet && !prev_quiet {
                quiet_runs += 1;
            }
            prev_quiet = quiet;

            if quiet_runs == block_threshold {
                done = true;
            }

            if let Some(b) = byte {
                if b != 0 {
                    out.push(b);
                }
            }

            if quiet && !done {
                self.clock.sleep(self.settings.poll_interval);
            }
        }

        out
    }

    /// Read until the first silence period. Equivalent to `read(1)`.
    pub fn read_until_quiet(&mut self) -> Vec<u8> {
        self.read(1)
    }
}
