//! Shared test utilities.
//!
//! Builds a `SerialPort` over mock backends and keeps handles to all of
//! them so tests can script the stream and assert on what the port did.

#![allow(dead_code)]

use quietport::{ManualClock, MockOpener, MockStream, MockStty, PortSettings, SerialPort};
use std::time::Duration;

/// A port wired to mocks, plus handles to every seam.
pub struct Harness {
    pub port: SerialPort,
    pub clock: ManualClock,
    pub stty: MockStty,
    pub opener: MockOpener,
    pub stream: MockStream,
}

/// Harness over an empty stream script.
pub fn harness() -> Harness {
    harness_with(MockStream::new("MOCK0"))
}

/// Harness over a pre-scripted stream.
pub fn harness_with(stream: MockStream) -> Harness {
    let settings = PortSettings::builder()
        .device("/dev/ttyMOCK0")
        .timeout(Duration::from_secs(2))
        .build();
    harness_with_settings(stream, settings)
}

/// Harness with full control over the settings.
pub fn harness_with_settings(stream: MockStream, settings: PortSettings) -> Harness {
    let clock = ManualClock::new();
    let stty = MockStty::new();
    let opener = MockOpener::new(stream.clone());

    let port = SerialPort::with_backends(
        settings,
        Box::new(stty.clone()),
        Box::new(opener.clone()),
        Box::new(clock.clone()),
    );

    Harness {
        port,
        clock,
        stty,
        opener,
        stream,
    }
}
