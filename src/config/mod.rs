//! Configuration module for vdt-send.
//!
//! This module provides TOML-based configuration with environment variable overrides.
//! Without any configuration file the built-in defaults reproduce the classic
//! Minitel link: `/dev/ttyUSB0` at 1200 baud, 7 data bits, even parity, 1 stop bit.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `VDT_SEND_CONFIG` environment variable (explicit path)
//! 2. `./vdt-send.toml` (current directory)
//! 3. `~/.config/vdt-send/config.toml` (XDG on Linux/macOS)
//! 4. `%APPDATA%\vdt-send\config.toml` (Windows)
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! - `VDT_SEND_SERIAL_DEVICE=/dev/ttyS0`
//! - `VDT_SEND_SERIAL_PROFILE=minitel-fast`
//! - `VDT_SEND_TRANSMIT_WRITE_MODE=per-byte`
//! - `VDT_SEND_LOG_LEVEL=debug`
//!
//! # Example
//!
//! ```toml
//! [serial]
//! device = "/dev/ttyUSB1"
//! profile = "minitel"
//! write_timeout_ms = 30000
//!
//! [transmit]
//! write_mode = "per-byte"
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{resolve_config_path, ConfigLoader};
pub use schema::{Config, LogFormat, LoggingConfig, SerialConfig, TransmitConfig, DEFAULT_DEVICE};
