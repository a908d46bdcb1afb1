//! quietport — minimal stty-backed serial port I/O.
//!
//! Opens a POSIX character device, configures its line discipline through
//! the external `stty` tool, and reads with a quiet-period heuristic: the
//! read loop stops after a configurable number of silence periods on the
//! line instead of a byte count or delimiter.
//!
//! # Modules
//!
//! - `serial`: the `SerialPort` object (lazy open, write, quiet-period read)
//! - `settings`: immutable port settings and the stty argument rendering
//! - `stty`: seam around the external configuration tool
//! - `port`: byte stream abstraction with real and mock implementations
//! - `clock`: time seam for the settle delay and the read deadline
//! - `config`: TOML configuration for the CLI
//!
//! # Example
//!
//! ```no_run
//! use quietport::{PortSettings, SerialPort};
//!
//! let settings = PortSettings::builder()
//!     .device("/dev/ttyAMA0")
//!     .baud_rate(57_600)
//!     .build();
//! let mut port = SerialPort::new(settings);
//!
//! port.write(b"AT\r\n");
//! let reply = port.read(1);
//! ```

pub mod clock;
pub mod config;
pub mod port;
pub mod serial;
pub mod settings;
pub mod stty;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use port::{MockOpener, MockStream, PortError, SerialStream, StreamOpener};
pub use serial::{Diagnostic, SerialPort, WRITE_SETTLE};
pub use settings::{PortSettings, PortSettingsBuilder};
pub use stty::{MockStty, SttyError, SttyRunner, SystemStty};

#[cfg(unix)]
pub use port::{DeviceStream, SystemOpener};
