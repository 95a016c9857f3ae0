//! vdt-send library
//!
//! Sends raw Videotex stream files to a Minitel over a serial line. Files
//! are written verbatim and in order; by default the line runs at
//! 1200 baud, 7 data bits, even parity, 1 stop bit, no flow control.
//!
//! # Modules
//!
//! - `config`: Configuration management with TOML support
//! - `error`: Top-level error type
//! - `logging`: `tracing` subscriber setup
//! - `port`: Port abstraction layer for the serial output stream
//! - `transmit`: The transmitter that reads files and writes them to the port

pub mod config;
pub mod error;
pub mod logging;
pub mod port;
pub mod transmit;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use error::{AppError, AppResult};
pub use port::{
    DataBits, LineProfile, LineSettings, MockSerialPort, Parity, PortError,
    SerialPortAdapter, StopBits, SyncSerialPort,
};
pub use transmit::{
    open_and_send, transmit_with, SentFile, TransmitError, TransmitReport, Transmitter, WriteMode,
};
