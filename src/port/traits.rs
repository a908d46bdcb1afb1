//! Core traits for the serial stream abstraction.
//!
//! `SerialStream` is the byte-level seam and `StreamOpener` the device-level
//! one. Both have a real implementation backed by a character device and a
//! mock implementation, so the read loop can be driven without hardware.

use super::error::PortError;
use std::path::Path;

/// A duplex byte stream in non-blocking mode.
pub trait SerialStream: Send + std::fmt::Debug {
    /// Poll a single byte from the stream.
    ///
    /// Returns `Ok(Some(byte))` when a byte was available and `Ok(None)`
    /// when the read would block, i.e. the line is currently quiet. Hard
    /// I/O failures bubble up.
    fn poll_byte(&mut self) -> Result<Option<u8>, PortError>;

    /// Write the whole buffer to the stream.
    fn write_all(&mut self, data: &[u8]) -> Result<(), PortError>;
}

/// Opens serial streams and answers whether a device path is usable.
pub trait StreamOpener: Send + std::fmt::Debug {
    /// Whether the path is readable and writable by the current process.
    fn accessible(&self, device: &Path) -> bool;

    /// Open the device for reading and writing in non-blocking mode.
    fn open(&self, device: &Path) -> Result<Box<dyn SerialStream>, PortError>;
}
