//! Device-backed stream implementation.
//!
//! Opens a character device read+write with `O_NONBLOCK | O_NOCTTY` and
//! exposes it through the `SerialStream` trait. Unix only.

use super::error::PortError;
use super::traits::{SerialStream, StreamOpener};
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// Serial stream backed by an open character device.
#[derive(Debug)]
pub struct DeviceStream {
    file: File,
}

impl SerialStream for DeviceStream {
    fn poll_byte(&mut self) -> Result<Option<u8>, PortError> {
        let mut buf = [0u8; 1];
        match self.file.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) if e.kind() == ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(PortError::Io(e)),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), PortError> {
        self.file.write_all(data)?;
        self.file.flush()?;
        Ok(())
    }
}

/// Opener for real character devices.
#[derive(Debug, Default)]
pub struct SystemOpener;

impl StreamOpener for SystemOpener {
    fn accessible(&self, device: &Path) -> bool {
        let Ok(path) = CString::new(device.as_os_str().as_bytes()) else {
            return false;
        };
        // access(2) answers for the real uid/gid, which is what matters for
        // the fopen-style open below.
        unsafe { libc::access(path.as_ptr(), libc::R_OK | libc::W_OK) == 0 }
    }

    fn open(&self, device: &Path) -> Result<Box<dyn SerialStream>, PortError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NONBLOCK | libc::O_NOCTTY)
            .open(device)?;
        Ok(Box::new(DeviceStream { file }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_is_not_accessible() {
        let opener = SystemOpener;
        assert!(!opener.accessible(Path::new("/definitely/not/a/device")));
    }

    #[test]
    fn test_regular_file_is_accessible_and_opens() {
        let mut tmp = tempfile::NamedTempFile::new().expect("temp file");
        tmp.write_all(b"xy").expect("seed data");

        let opener = SystemOpener;
        assert!(opener.accessible(tmp.path()));

        let mut stream = opener.open(tmp.path()).expect("open");
        assert_eq!(stream.poll_byte().expect("poll"), Some(b'x'));
        assert_eq!(stream.poll_byte().expect("poll"), Some(b'y'));
        // EOF on a regular file reads as a quiet line
        assert_eq!(stream.poll_byte().expect("poll"), None);
    }

    #[test]
    fn test_open_missing_path_fails() {
        let opener = SystemOpener;
        assert!(opener.open(Path::new("/definitely/not/a/device")).is_err());
    }
}
