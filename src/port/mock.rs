//! Mock stream implementations for testing.
//!
//! `MockStream` replays a scripted sequence of polls (bytes, explicit quiet
//! polls, and hard errors) and records every write, so the read-termination
//! loop and the write path can be exercised without hardware. `MockOpener`
//! hands the scripted stream to whatever lazily opens the port.

use super::error::PortError;
use super::traits::{SerialStream, StreamOpener};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

/// One scripted poll outcome.
#[derive(Debug, Clone, Copy)]
enum Poll {
    Byte(u8),
    Quiet,
    Error,
}

#[derive(Debug, Default)]
struct MockStreamState {
    script: VecDeque<Poll>,
    write_log: Vec<Vec<u8>>,
}

/// Scripted serial stream for tests.
///
/// Clones share state, so a test can keep a handle for assertions while the
/// port owns a boxed clone. An exhausted script polls as quiet.
///
/// # Example
/// ```
/// use quietport::port::{MockStream, SerialStream};
///
/// let mut stream = MockStream::new("MOCK0");
/// stream.enqueue_bytes(b"OK");
/// stream.enqueue_quiet(1);
///
/// assert_eq!(stream.poll_byte().unwrap(), Some(b'O'));
/// assert_eq!(stream.poll_byte().unwrap(), Some(b'K'));
/// assert_eq!(stream.poll_byte().unwrap(), None);
/// ```
#[derive(Clone)]
pub struct MockStream {
    name: String,
    state: Arc<Mutex<MockStreamState>>,
}

impl MockStream {
    /// Create a new mock stream with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockStreamState::default())),
        }
    }

    /// Append bytes to the poll script, one poll per byte.
    pub fn enqueue_bytes(&mut self, data: &[u8]) {
        let mut state = self.state.lock();
        state.script.extend(data.iter().map(|b| Poll::Byte(*b)));
    }

    /// Append `count` quiet polls to the script.
    pub fn enqueue_quiet(&mut self, count: usize) {
        let mut state = self.state.lock();
        state.script.extend(std::iter::repeat(Poll::Quiet).take(count));
    }

    /// Append a hard I/O error to the script.
    pub fn enqueue_error(&mut self) {
        self.state.lock().script.push_back(Poll::Error);
    }

    /// Number of scripted polls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.state.lock().script.len()
    }

    /// Copy of all buffers written to the stream.
    pub fn write_log(&self) -> Vec<Vec<u8>> {
        self.state.lock().write_log.clone()
    }
}

impl SerialStream for MockStream {
    fn poll_byte(&mut self) -> Result<Option<u8>, PortError> {
        match self.state.lock().script.pop_front() {
            Some(Poll::Byte(b)) => Ok(Some(b)),
            Some(Poll::Quiet) | None => Ok(None),
            Some(Poll::Error) => Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "scripted read failure",
            ))),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), PortError> {
        self.state.lock().write_log.push(data.to_vec());
        Ok(())
    }
}

impl std::fmt::Debug for MockStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStream")
            .field("name", &self.name)
            .field("remaining", &self.remaining())
            .finish()
    }
}

#[derive(Debug)]
struct MockOpenerState {
    stream: MockStream,
    accessible: bool,
    fail_open: bool,
    open_count: u32,
}

/// Opener that hands out clones of a scripted stream.
#[derive(Clone, Debug)]
pub struct MockOpener {
    state: Arc<Mutex<MockOpenerState>>,
}

impl MockOpener {
    /// Create an opener for an accessible device backed by `stream`.
    pub fn new(stream: MockStream) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockOpenerState {
                stream,
                accessible: true,
                fail_open: false,
                open_count: 0,
            })),
        }
    }

    /// Make the device path report as not readable/writable.
    pub fn deny_access(&mut self) {
        self.state.lock().accessible = false;
    }

    /// Restore read/write access to the device path.
    pub fn allow_access(&mut self) {
        self.state.lock().accessible = true;
    }

    /// Make `open` fail even though the accessibility check passes.
    pub fn fail_open(&mut self) {
        self.state.lock().fail_open = true;
    }

    /// How many times a stream was successfully opened.
    pub fn open_count(&self) -> u32 {
        self.state.lock().open_count
    }
}

impl StreamOpener for MockOpener {
    fn accessible(&self, _device: &Path) -> bool {
        self.state.lock().accessible
    }

    fn open(&self, _device: &Path) -> Result<Box<dyn SerialStream>, PortError> {
        let mut state = self.state.lock();
        if state.fail_open {
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "scripted open failure",
            )));
        }
        state.open_count += 1;
        Ok(Box::new(state.stream.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_replays_in_order() {
        let mut stream = MockStream::new("MOCK0");
        stream.enqueue_bytes(b"AB");
        stream.enqueue_quiet(1);
        stream.enqueue_bytes(b"C");

        assert_eq!(stream.poll_byte().unwrap(), Some(b'A'));
        assert_eq!(stream.poll_byte().unwrap(), Some(b'B'));
        assert_eq!(stream.poll_byte().unwrap(), None);
        assert_eq!(stream.poll_byte().unwrap(), Some(b'C'));
        // exhausted script keeps polling quiet
        assert_eq!(stream.poll_byte().unwrap(), None);
    }

    #[test]
    fn test_write_log_records_buffers() {
        let mut stream = MockStream::new("MOCK0");
        stream.write_all(b"one").unwrap();
        stream.write_all(b"two").unwrap();

        assert_eq!(stream.write_log(), vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn test_clones_share_script() {
        let mut stream = MockStream::new("MOCK0");
        stream.enqueue_bytes(b"Z");

        let mut clone = stream.clone();
        assert_eq!(clone.poll_byte().unwrap(), Some(b'Z'));
        assert_eq!(stream.remaining(), 0);
    }

    #[test]
    fn test_scripted_read_error() {
        let mut stream = MockStream::new("MOCK0");
        stream.enqueue_bytes(b"A");
        stream.enqueue_error();
        stream.enqueue_bytes(b"B");

        assert_eq!(stream.poll_byte().unwrap(), Some(b'A'));
        assert!(stream.poll_byte().is_err());
        // the error is a single script item; the script continues
        assert_eq!(stream.poll_byte().unwrap(), Some(b'B'));
    }

    #[test]
    fn test_opener_denied_access() {
        let mut opener = MockOpener::new(MockStream::new("MOCK0"));
        opener.deny_access();

        assert!(!opener.accessible(Path::new("/dev/ttyMOCK0")));
        assert_eq!(opener.open_count(), 0);
    }

    #[test]
    fn test_opener_counts_opens() {
        let opener = MockOpener::new(MockStream::new("MOCK0"));
        opener.open(Path::new("/dev/ttyMOCK0")).unwrap();
        opener.open(Path::new("/dev/ttyMOCK0")).unwrap();

        assert_eq!(opener.open_count(), 2);
    }
}
