//! Synchronous serial port implementation.
//!
//! Wraps the `serialport` crate's `SerialPort` trait with our own
//! `SerialPortAdapter` trait so the transmitter can be driven by a mock.

use super::error::PortError;
use super::traits::{LineSettings, SerialPortAdapter};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

/// Driver timeout used when the line settings ask for blocking writes.
///
/// `write_all_bytes` keeps retrying after each expiry, so this only bounds
/// how often a stalled line is reported.
const BLOCKING_POLL: Duration = Duration::from_secs(1);

/// Synchronous serial port implementation wrapping `serialport::SerialPort`.
pub struct SyncSerialPort {
    port: Box<dyn serialport::SerialPort>,
    name: String,
    write_timeout: Option<Duration>,
}

impl SyncSerialPort {
    /// Open a serial device with the given line settings.
    ///
    /// # Example
    /// ```no_run
    /// use vdt_send::port::{LineSettings, SyncSerialPort};
    ///
    /// let port = SyncSerialPort::open("/dev/ttyUSB0", &LineSettings::minitel())?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(device: &str, settings: &LineSettings) -> Result<Self, PortError> {
        let port = serialport::new(device, settings.baud_rate)
            .data_bits(settings.data_bits.into())
            .flow_control(serialport::FlowControl::None)
            .parity(settings.parity.into())
            .stop_bits(settings.stop_bits.into())
            .timeout(settings.write_timeout.unwrap_or(BLOCKING_POLL))
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => PortError::not_found(device),
                serialport::ErrorKind::InvalidInput => PortError::config(e.to_string()),
                serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => {
                    PortError::not_found(device)
                }
                _ => PortError::Serial(e),
            })?;

        info!("Opened {} at {}", device, settings);

        Ok(Self {
            port,
            name: device.to_string(),
            write_timeout: settings.write_timeout,
        })
    }
}

impl SerialPortAdapter for SyncSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        self.port.write(data).map_err(|e| {
            if e.kind() == std::io::ErrorKind::TimedOut {
                PortError::timeout(self.write_timeout.unwrap_or(BLOCKING_POLL))
            } else {
                PortError::Io(e)
            }
        })
    }

    fn flush(&mut self) -> Result<(), PortError> {
        self.port.flush().map_err(PortError::Io)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout
    }
}

impl Drop for SyncSerialPort {
    fn drop(&mut self) {
        debug!("Closing {}", self.name);
    }
}

impl std::fmt::Debug for SyncSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSerialPort")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate())
            .field("write_timeout", &self.write_timeout)
            .finish()
    }
}
