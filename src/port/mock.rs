//! Mock serial port implementation for testing.
//!
//! Provides a `MockSerialPort` that records every write without requiring
//! hardware. Clones share state, so a test can keep one handle while the
//! transmitter owns another.

use super::error::PortError;
use super::traits::SerialPortAdapter;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Inner state of the mock port, protected by a mutex for interior mutability.
#[derive(Debug, Default)]
struct MockPortState {
    /// Every write call, in order.
    write_log: Vec<Vec<u8>>,
    /// Fail once this many bytes have been accepted in total.
    fail_after: Option<usize>,
    /// Whether the next write should time out.
    should_timeout: bool,
    /// Largest number of bytes accepted per write call.
    max_chunk: Option<usize>,
    /// Timeout reported by the port.
    write_timeout: Option<Duration>,
    /// Number of flush calls.
    flushes: usize,
}

/// Mock serial port implementation for testing.
///
/// # Example
/// ```
/// use vdt_send::port::{MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.write_all_bytes(b"\x0c").unwrap();
/// port.write_all_bytes(b"Hello").unwrap();
///
/// assert_eq!(port.get_write_log().len(), 2);
/// assert_eq!(port.written(), b"\x0cHello");
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    name: String,
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState::default())),
        }
    }

    /// Get a copy of every write call made to the port.
    pub fn get_write_log(&self) -> Vec<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state.write_log.clone()
    }

    /// All bytes written so far, concatenated.
    pub fn written(&self) -> Vec<u8> {
        let state = self.state.lock().unwrap();
        state.write_log.concat()
    }

    /// Number of write calls made so far.
    pub fn write_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.write_log.len()
    }

    /// Make writes fail with a broken pipe once `bytes` bytes were accepted.
    pub fn fail_after(&mut self, bytes: usize) {
        let mut state = self.state.lock().unwrap();
        state.fail_after = Some(bytes);
    }

    /// Set whether the next write should time out.
    pub fn set_should_timeout(&mut self, should_timeout: bool) {
        let mut state = self.state.lock().unwrap();
        state.should_timeout = should_timeout;
    }

    /// Accept at most `max` bytes per write call, like a full driver buffer.
    pub fn set_max_chunk(&mut self, max: usize) {
        let mut state = self.state.lock().unwrap();
        state.max_chunk = Some(max);
    }

    /// Set the write timeout the port reports.
    pub fn set_write_timeout(&mut self, timeout: Option<Duration>) {
        let mut state = self.state.lock().unwrap();
        state.write_timeout = timeout;
    }

    /// Number of times the port was flushed.
    pub fn flushes(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.flushes
    }

    /// Number of live handles sharing this port's state.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.state)
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock().unwrap();

        if state.should_timeout {
            state.should_timeout = false;
            return Err(PortError::timeout(
                state.write_timeout.unwrap_or(Duration::from_secs(1)),
            ));
        }

        let accepted: usize = state.write_log.iter().map(Vec::len).sum();
        let mut len = data.len();
        if let Some(max) = state.max_chunk {
            len = len.min(max);
        }
        if let Some(limit) = state.fail_after {
            if accepted >= limit {
                return Err(PortError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "mock port disconnected",
                )));
            }
            len = len.min(limit - accepted);
        }

        state.write_log.push(data[..len].to_vec());
        Ok(len)
    }

    fn flush(&mut self) -> Result<(), PortError> {
        let mut state = self.state.lock().unwrap();
        state.flushes += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn write_timeout(&self) -> Option<Duration> {
        let state = self.state.lock().unwrap();
        state.write_timeout
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("write_calls", &self.write_calls())
            .finish()
    }
}
