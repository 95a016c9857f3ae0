//! Port abstraction layer for the outgoing serial stream.
//!
//! The transmitter only ever writes, so the adapter trait is write-only.
//! `SyncSerialPort` drives real hardware through the `serialport` crate and
//! `MockSerialPort` records writes for tests.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use mock::MockSerialPort;
pub use sync_port::*;
pub use traits::*;
