//! Stream-level error type.
//!
//! Kept separate from configuration errors so the read/write path only ever
//! deals with I/O failures.

use thiserror::Error;

/// Errors that can occur on the serial byte stream.
#[derive(Debug, Error)]
pub enum PortError {
    /// An I/O error occurred while opening, reading, or writing the device.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PortError {
    /// Whether this error is the non-blocking "no data right now" signal.
    ///
    /// Stream implementations normally translate this case into a quiet
    /// poll before it ever reaches a caller; the predicate exists for the
    /// ones that cannot.
    pub fn is_would_block(&self) -> bool {
        match self {
            Self::Io(e) => e.kind() == std::io::ErrorKind::WouldBlock,
        }
    }
}
