//! Core traits and line settings for the serial output stream.
//!
//! Defines the `SerialPortAdapter` trait that allows both real serial ports
//! and mock implementations to be used interchangeably by the transmitter.

use super::error::PortError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Line parameters applied when a serial port is opened.
///
/// Flow control is always off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSettings {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Number of data bits per character.
    pub data_bits: DataBits,

    /// Parity checking mode.
    pub parity: Parity,

    /// Number of stop bits.
    pub stop_bits: StopBits,

    /// Upper bound on a single write. `None` blocks until the line drains.
    pub write_timeout: Option<Duration>,
}

impl LineSettings {
    /// Minitel link: 1200 baud, 7 data bits, even parity, 1 stop bit.
    pub const fn minitel() -> Self {
        Self {
            baud_rate: 1200,
            data_bits: DataBits::Seven,
            parity: Parity::Even,
            stop_bits: StopBits::One,
            write_timeout: None,
        }
    }
}

impl Default for LineSettings {
    fn default() -> Self {
        Self::minitel()
    }
}

impl fmt::Display for LineSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data_bits = match self.data_bits {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        };
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Odd => 'O',
            Parity::Even => 'E',
        };
        let stop_bits = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        write!(f, "{} {}{}{}", self.baud_rate, data_bits, parity, stop_bits)
    }
}

/// Named presets of line settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineProfile {
    /// 1200 baud 7E1, the Minitel default.
    #[default]
    #[serde(rename = "minitel")]
    Minitel,
    /// 9600 baud 7E1, for Minitels switched to the fast rate.
    #[serde(rename = "minitel-fast")]
    MinitelFast,
    /// 9600 baud 8N1.
    #[serde(rename = "raw-9600")]
    Raw9600,
}

impl LineProfile {
    /// Line settings for this profile.
    pub fn settings(self) -> LineSettings {
        match self {
            Self::Minitel => LineSettings::minitel(),
            Self::MinitelFast => LineSettings {
                baud_rate: 9600,
                ..LineSettings::minitel()
            },
            Self::Raw9600 => LineSettings {
                baud_rate: 9600,
                data_bits: DataBits::Eight,
                parity: Parity::None,
                ..LineSettings::minitel()
            },
        }
    }

    /// The name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minitel => "minitel",
            Self::MinitelFast => "minitel-fast",
            Self::Raw9600 => "raw-9600",
        }
    }
}

impl fmt::Display for LineProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minitel" => Ok(Self::Minitel),
            "minitel-fast" => Ok(Self::MinitelFast),
            "raw-9600" => Ok(Self::Raw9600),
            other => Err(format!(
                "unknown line profile '{other}' (expected minitel, minitel-fast or raw-9600)"
            )),
        }
    }
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

/// Parity checking modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopBits {
    One,
    Two,
}

impl From<StopBits> for serialport::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

/// Trait for the outgoing side of a serial port.
///
/// Implementors provide a single raw write; bulk emission and timeout
/// handling are layered on top by `write_all_bytes`.
pub trait SerialPortAdapter: Send + fmt::Debug {
    /// Write bytes to the serial port.
    ///
    /// Returns the number of bytes actually written, which may be fewer
    /// than `data.len()`.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Block until all buffered output has been transmitted.
    fn flush(&mut self) -> Result<(), PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;

    /// The write timeout in force, or `None` when writes may block forever.
    fn write_timeout(&self) -> Option<Duration> {
        None
    }

    /// Write the whole buffer.
    fn write_all_bytes(&mut self, data: &[u8]) -> Result<(), PortError> {
        let mut written = 0;
        self.write_all_counted(data, &mut written)
    }

    /// Write the whole buffer, adding each accepted chunk to `written`.
    ///
    /// On error `written` holds what reached the port before the failure.
    /// Interrupted writes are retried. Timeouts are retried only when the
    /// port has no write timeout, so a stalled line blocks instead of
    /// failing.
    fn write_all_counted(
        &mut self,
        mut data: &[u8],
        written: &mut usize,
    ) -> Result<(), PortError> {
        while !data.is_empty() {
            match self.write_bytes(data) {
                Ok(0) => {
                    return Err(PortError::Io(std::io::Error::new(
                        std::io::ErrorKind::WriteZero,
                        "serial port accepted no bytes",
                    )))
                }
                Ok(n) => {
                    *written += n;
                    data = &data[n..];
                }
                Err(PortError::Io(e)) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(PortError::Timeout(waited)) if self.write_timeout().is_none() => {
                    debug!(
                        "Write to {} stalled for {:?}, {} bytes pending; waiting",
                        self.name(),
                        waited,
                        data.len()
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
