//! Port-specific error types.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while opening or writing to a serial port.
#[derive(Debug, Error)]
pub enum PortError {
    /// The serial device does not exist.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// An I/O error occurred while writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The driver rejected the line settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A write did not complete within the configured timeout.
    #[error("Write timed out after {0:?}")]
    Timeout(Duration),

    /// Any other error reported by the `serialport` crate.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a device path.
    pub fn not_found(device: impl Into<String>) -> Self {
        Self::NotFound(device.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a Timeout error from a duration.
    pub fn timeout(duration: Duration) -> Self {
        Self::Timeout(duration)
    }
}
