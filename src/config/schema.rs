//! Configuration schema definitions.
//!
//! All sections default independently, so a file only needs the keys it
//! changes.

use super::error::{ConfigError, ConfigResult};
use crate::port::{DataBits, LineProfile, LineSettings, Parity, StopBits};
use crate::transmit::WriteMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Device the Minitel adapter usually enumerates as.
pub const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial line configuration
    pub serial: SerialConfig,
    /// Transmission behaviour
    pub transmit: TransmitConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Check values that parse fine but cannot be used.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.serial.device.trim().is_empty() {
            return Err(ConfigError::validation("serial.device", "must not be empty"));
        }
        if self.serial.baud_rate == Some(0) {
            return Err(ConfigError::validation(
                "serial.baud_rate",
                "must be greater than zero",
            ));
        }
        if self.serial.write_timeout_ms == Some(0) {
            return Err(ConfigError::validation(
                "serial.write_timeout_ms",
                "must be greater than zero; omit it to block",
            ));
        }
        Ok(())
    }
}

/// Serial line configuration section.
///
/// `profile` selects a preset; any explicit field below it overrides the
/// preset's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Serial device path
    pub device: String,
    /// Line profile: "minitel", "minitel-fast" or "raw-9600"
    pub profile: LineProfile,
    /// Baud rate override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baud_rate: Option<u32>,
    /// Data bits override: "five" .. "eight"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_bits: Option<DataBits>,
    /// Parity override: "none", "odd" or "even"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parity: Option<Parity>,
    /// Stop bits override: "one" or "two"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_bits: Option<StopBits>,
    /// Write timeout in milliseconds; absent means block indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_timeout_ms: Option<u64>,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_string(),
            profile: LineProfile::default(),
            baud_rate: None,
            data_bits: None,
            parity: None,
            stop_bits: None,
            write_timeout_ms: None,
        }
    }
}

impl SerialConfig {
    /// Resolve the profile and overrides into concrete line settings.
    pub fn line_settings(&self) -> LineSettings {
        let preset = self.profile.settings();
        LineSettings {
            baud_rate: self.baud_rate.unwrap_or(preset.baud_rate),
            data_bits: self.data_bits.unwrap_or(preset.data_bits),
            parity: self.parity.unwrap_or(preset.parity),
            stop_bits: self.stop_bits.unwrap_or(preset.stop_bits),
            write_timeout: self.write_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Transmission configuration section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmitConfig {
    /// "bulk" or "per-byte"
    pub write_mode: WriteMode,
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    Pretty,
    /// Compact format
    #[default]
    Compact,
}
