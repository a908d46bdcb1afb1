//! Byte stream abstraction for the serial device.
//!
//! Provides the `SerialStream`/`StreamOpener` seams plus real and mock
//! implementations, enabling dependency injection and testing without
//! hardware.

pub mod error;
pub mod mock;
pub mod traits;

#[cfg(unix)]
pub mod stream;

pub use error::PortError;
pub use mock::{MockOpener, MockStream};
pub use traits::*;

#[cfg(unix)]
pub use stream::{DeviceStream, SystemOpener};
