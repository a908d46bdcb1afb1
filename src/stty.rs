//! Seam around the external line-configuration tool.
//!
//! The port never builds a shell command line: `SttyRunner::apply` takes
//! the rendered argument list and `SystemStty` hands it to `stty` via
//! `std::process::Command`. `MockStty` records calls so tests can assert
//! that configuration happens exactly once.

use parking_lot::Mutex;
use std::process::Command;
use std::sync::Arc;
use thiserror::Error;

/// Name of the line-configuration helper binary.
const STTY: &str = "stty";

/// Errors from probing or invoking the configuration tool.
#[derive(Debug, Error)]
pub enum SttyError {
    /// The tool ran but produced no version output.
    #[error("The stty command is not available")]
    Unavailable,

    /// The tool could not be launched at all.
    #[error("Failed to run stty: {0}")]
    Spawn(#[from] std::io::Error),

    /// The tool ran and reported failure.
    #[error("stty exited with {0}")]
    Failed(std::process::ExitStatus),
}

/// Invokes the line-configuration tool.
pub trait SttyRunner: Send + std::fmt::Debug {
    /// Version probe; succeeds only when the tool produced output.
    fn probe(&self) -> Result<(), SttyError>;

    /// Apply the rendered argument list (including `-F <device>`).
    fn apply(&self, args: &[String]) -> Result<(), SttyError>;
}

/// Runner backed by the system `stty` binary.
#[derive(Debug, Default)]
pub struct SystemStty;

impl SttyRunner for SystemStty {
    fn probe(&self) -> Result<(), SttyError> {
        let output = Command::new(STTY).arg("--version").output()?;
        if output.stdout.is_empty() {
            return Err(SttyError::Unavailable);
        }
        Ok(())
    }

    fn apply(&self, args: &[String]) -> Result<(), SttyError> {
        let status = Command::new(STTY).args(args).status()?;
        if !status.success() {
            return Err(SttyError::Failed(status));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct MockSttyState {
    available: bool,
    applied: Vec<Vec<String>>,
}

/// Call-recording runner for tests. Clones share state.
///
/// # Example
/// ```
/// use quietport::stty::{MockStty, SttyRunner};
///
/// let stty = MockStty::new();
/// stty.apply(&["-F".into(), "/dev/ttyMOCK0".into(), "raw".into()]).unwrap();
///
/// assert_eq!(stty.apply_count(), 1);
/// assert_eq!(stty.applied()[0][2], "raw");
/// ```
#[derive(Clone, Debug)]
pub struct MockStty {
    state: Arc<Mutex<MockSttyState>>,
}

impl MockStty {
    /// A runner whose probe succeeds.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockSttyState {
                available: true,
                applied: Vec::new(),
            })),
        }
    }

    /// A runner whose probe reports the tool as missing.
    pub fn unavailable() -> Self {
        let stty = Self::new();
        stty.state.lock().available = false;
        stty
    }

    /// Change the probe outcome for subsequent open attempts.
    pub fn set_available(&self, available: bool) {
        self.state.lock().available = available;
    }

    /// Number of apply invocations observed.
    pub fn apply_count(&self) -> usize {
        self.state.lock().applied.len()
    }

    /// Copies of every applied argument list, in order.
    pub fn applied(&self) -> Vec<Vec<String>> {
        self.state.lock().applied.clone()
    }
}

impl Default for MockStty {
    fn default() -> Self {
        Self::new()
    }
}

impl SttyRunner for MockStty {
    fn probe(&self) -> Result<(), SttyError> {
        if self.state.lock().available {
            Ok(())
        } else {
            Err(SttyError::Unavailable)
        }
    }

    fn apply(&self, args: &[String]) -> Result<(), SttyError> {
        self.state.lock().applied.push(args.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SttyError::Unavailable.to_string(),
            "The stty command is not available"
        );
    }

    #[test]
    fn test_mock_probe_toggles() {
        let stty = MockStty::unavailable();
        assert!(stty.probe().is_err());

        stty.set_available(true);
        assert!(stty.probe().is_ok());
    }

    #[test]
    fn test_mock_records_applied_args() {
        let stty = MockStty::new();
        stty.apply(&["-F".into(), "/dev/ttyMOCK0".into()]).unwrap();
        stty.apply(&["-F".into(), "/dev/ttyMOCK1".into()]).unwrap();

        assert_eq!(stty.apply_count(), 2);
        assert_eq!(stty.applied()[1][1], "/dev/ttyMOCK1");
    }
}
