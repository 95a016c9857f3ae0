//! Top-level error type for the `vdt-send` binary.

use crate::config::ConfigError;
use crate::transmit::TransmitError;
use thiserror::Error;

/// Everything that can stop a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transmit(#[from] TransmitError),

    /// The log filter could not be parsed or a subscriber was already set.
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

/// Result alias for the binary's top-level operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortError;

    #[test]
    fn test_transparent_display() {
        let err: AppError = TransmitError::Open {
            device: "/dev/ttyUSB0".to_string(),
            source: PortError::not_found("/dev/ttyUSB0"),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Cannot open serial port /dev/ttyUSB0: Serial port not found: /dev/ttyUSB0"
        );

        let err: AppError = ConfigError::validation("serial.device", "must not be empty").into();
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for 'serial.device': must not be empty"
        );
    }
}
