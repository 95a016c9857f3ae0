//! Serial transmitter: sends files verbatim down a serial line.
//!
//! The flow is strictly linear. The port is opened first, then every file
//! is read fully and written in argument order, then the port is flushed
//! and closed. Any error aborts the run. Bytes already on the wire stay
//! there; files after the failing one are never read.
//!
//! The transmitter owns its port, so the device is released on every exit
//! path, not only after a successful `close`.

use crate::port::{LineSettings, PortError, SerialPortAdapter, SyncSerialPort};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// How bytes are handed to the port. Both modes put the same bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// One write call per buffer; the driver paces the line.
    #[default]
    Bulk,
    /// One write call per byte.
    PerByte,
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bulk" => Ok(Self::Bulk),
            "per-byte" => Ok(Self::PerByte),
            other => Err(format!(
                "unknown write mode '{other}' (expected bulk or per-byte)"
            )),
        }
    }
}

/// Errors that abort a transmission.
#[derive(Debug, Error)]
pub enum TransmitError {
    /// The serial device could not be opened.
    #[error("Cannot open serial port {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: PortError,
    },

    /// An input file could not be read.
    #[error("Cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing the port failed.
    #[error("Serial write failed: {0}")]
    Write(#[from] PortError),
}

/// One file that was sent completely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentFile {
    pub path: PathBuf,
    pub bytes: usize,
}

/// What has been put on the wire so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransmitReport {
    /// Files sent completely, in argument order.
    pub files: Vec<SentFile>,
    /// Bytes written, including raw `send_bytes` calls.
    pub bytes_written: u64,
}

/// Writes byte streams to a serial port it exclusively owns.
#[derive(Debug)]
pub struct Transmitter<P: SerialPortAdapter> {
    port: P,
    mode: WriteMode,
    report: TransmitReport,
}

impl<P: SerialPortAdapter> Transmitter<P> {
    /// Take ownership of an open port.
    pub fn new(port: P, mode: WriteMode) -> Self {
        Self {
            port,
            mode,
            report: TransmitReport::default(),
        }
    }

    /// Write `bytes` to the port in the configured write mode.
    ///
    /// Bytes the port accepted before a failure are still counted.
    pub fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), TransmitError> {
        let mut written = 0;
        let result = match self.mode {
            WriteMode::Bulk => self.port.write_all_counted(bytes, &mut written),
            WriteMode::PerByte => bytes.iter().try_for_each(|byte| {
                self.port
                    .write_all_counted(std::slice::from_ref(byte), &mut written)
            }),
        };
        self.report.bytes_written += written as u64;
        result.map_err(TransmitError::from)
    }

    /// Read `path` fully, then write its contents. Returns the byte count.
    pub fn send_file(&mut self, path: impl AsRef<Path>) -> Result<usize, TransmitError> {
        let path = path.as_ref();
        let stream = std::fs::read(path).map_err(|source| TransmitError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if stream.is_empty() {
            debug!("{} is empty, nothing to send", path.display());
        }
        self.send_bytes(&stream)?;

        info!("Sent {} ({} bytes) to {}", path.display(), stream.len(), self.port.name());
        self.report.files.push(SentFile {
            path: path.to_path_buf(),
            bytes: stream.len(),
        });
        Ok(stream.len())
    }

    /// Send each file in order, stopping at the first error.
    pub fn send_files<I, T>(&mut self, paths: I) -> Result<(), TransmitError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<Path>,
    {
        for path in paths {
            self.send_file(path)?;
        }
        Ok(())
    }

    /// What has been sent so far.
    pub fn report(&self) -> &TransmitReport {
        &self.report
    }

    /// Flush pending output and release the port.
    pub fn close(self) -> Result<TransmitReport, TransmitError> {
        let Self {
            mut port, report, ..
        } = self;
        port.flush()?;
        info!(
            "Closing {} after {} file(s), {} bytes",
            port.name(),
            report.files.len(),
            report.bytes_written
        );
        drop(port);
        Ok(report)
    }
}

/// Open a port through `open`, send `paths`, then close the port.
///
/// `open` runs before any file is touched, so an unusable device fails the
/// run without reading input.
pub fn transmit_with<P, F, I, T>(
    device: &str,
    open: F,
    mode: WriteMode,
    paths: I,
) -> Result<TransmitReport, TransmitError>
where
    P: SerialPortAdapter,
    F: FnOnce() -> Result<P, PortError>,
    I: IntoIterator<Item = T>,
    T: AsRef<Path>,
{
    let port = open().map_err(|source| TransmitError::Open {
        device: device.to_string(),
        source,
    })?;

    let mut transmitter = Transmitter::new(port, mode);
    transmitter.send_files(paths)?;
    transmitter.close()
}

/// Open `device` with `settings` and send `paths` to it.
pub fn open_and_send<I, T>(
    device: &str,
    settings: &LineSettings,
    mode: WriteMode,
    paths: I,
) -> Result<TransmitReport, TransmitError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<Path>,
{
    transmit_with(device, || SyncSerialPort::open(device, settings), mode, paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MockSerialPort;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write_input(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_write_mode_from_str() {
        assert_eq!("bulk".parse::<WriteMode>(), Ok(WriteMode::Bulk));
        assert_eq!("PER-BYTE".parse::<WriteMode>(), Ok(WriteMode::PerByte));
        assert!("chunked".parse::<WriteMode>().is_err());
    }

    #[test]
    fn test_per_byte_issues_one_write_per_byte() {
        let port = MockSerialPort::new("MOCK0");
        let mut tx = Transmitter::new(port.clone(), WriteMode::PerByte);

        tx.send_bytes(b"\x1b\x5b\x32\x4a").unwrap();
        assert_eq!(port.write_calls(), 4);
        assert!(port.get_write_log().iter().all(|w| w.len() == 1));
        assert_eq!(port.written(), b"\x1b\x5b\x32\x4a");
    }

    #[test]
    fn test_bulk_issues_single_write() {
        let port = MockSerialPort::new("MOCK0");
        let mut tx = Transmitter::new(port.clone(), WriteMode::Bulk);

        tx.send_bytes(b"3615 MINITEL").unwrap();
        assert_eq!(port.write_calls(), 1);
        assert_eq!(tx.report().bytes_written, 12);
    }

    #[test]
    fn test_files_are_sent_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_input(&dir, "a.vdt", b"\x0cHELLO");
        let second = write_input(&dir, "b.vdt", b"\x1f\x41\x41WORLD");

        let port = MockSerialPort::new("MOCK0");
        let mut tx = Transmitter::new(port.clone(), WriteMode::PerByte);
        tx.send_files([&first, &second]).unwrap();
        let report = tx.close().unwrap();

        assert_eq!(port.written(), b"\x0cHELLO\x1f\x41\x41WORLD");
        assert_eq!(
            report.files,
            vec![
                SentFile { path: first, bytes: 6 },
                SentFile { path: second, bytes: 8 },
            ]
        );
        assert_eq!(report.bytes_written, 14);
    }

    #[test]
    fn test_empty_file_sends_nothing_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write_input(&dir, "empty.vdt", b"");
        let page = write_input(&dir, "page.vdt", b"PAGE");

        let port = MockSerialPort::new("MOCK0");
        let mut tx = Transmitter::new(port.clone(), WriteMode::Bulk);
        tx.send_files([&empty, &page]).unwrap();

        assert_eq!(port.written(), b"PAGE");
        assert_eq!(tx.report().files[0].bytes, 0);
        assert_eq!(tx.report().files.len(), 2);
    }

    #[test]
    fn test_missing_file_stops_run_without_rollback() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_input(&dir, "first.vdt", b"ONE");
        let missing = dir.path().join("missing.vdt");
        let last = write_input(&dir, "last.vdt", b"THREE");

        let port = MockSerialPort::new("MOCK0");
        let mut tx = Transmitter::new(port.clone(), WriteMode::Bulk);
        let err = tx.send_files([&first, &missing, &last]).unwrap_err();

        match err {
            TransmitError::Read { path, .. } => assert_eq!(path, missing),
            other => panic!("Expected read error, got {:?}", other),
        }
        assert_eq!(port.written(), b"ONE");
        assert_eq!(tx.report().files.len(), 1);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let page = write_input(&dir, "page.vdt", b"ABCDEF");

        let mut port = MockSerialPort::new("MOCK0");
        port.fail_after(2);
        let mut tx = Transmitter::new(port.clone(), WriteMode::PerByte);

        let err = tx.send_file(&page).unwrap_err();
        assert!(matches!(err, TransmitError::Write(PortError::Io(_))));
        assert_eq!(port.written(), b"AB");
        assert_eq!(tx.report().bytes_written, 2);
        assert!(tx.report().files.is_empty());
    }

    #[test]
    fn test_short_bulk_writes_count_toward_report_on_failure() {
        let mut port = MockSerialPort::new("MOCK0");
        port.set_max_chunk(4);
        port.fail_after(6);
        let mut tx = Transmitter::new(port.clone(), WriteMode::Bulk);

        tx.send_bytes(b"0123").unwrap();
        let err = tx.send_bytes(b"456789").unwrap_err();
        assert!(matches!(err, TransmitError::Write(_)));
        assert_eq!(port.written(), b"012345");
        assert_eq!(tx.report().bytes_written, 6);
    }

    #[test]
    fn test_close_flushes_and_releases_port() {
        let port = MockSerialPort::new("MOCK0");
        let tx = Transmitter::new(port.clone(), WriteMode::Bulk);
        assert_eq!(port.handle_count(), 2);

        tx.close().unwrap();
        assert_eq!(port.flushes(), 1);
        assert_eq!(port.handle_count(), 1);
    }

    #[test]
    fn test_port_released_on_error() {
        let port = MockSerialPort::new("MOCK0");
        let opened = port.clone();

        let result = transmit_with(
            "MOCK0",
            move || Ok(opened),
            WriteMode::Bulk,
            ["/nonexistent/page.vdt"],
        );

        assert!(matches!(result, Err(TransmitError::Read { .. })));
        assert_eq!(port.handle_count(), 1);
        assert_eq!(port.flushes(), 0);
    }

    #[test]
    fn test_open_failure_precedes_file_reads() {
        let result = transmit_with::<MockSerialPort, _, _, _>(
            "/dev/ttyUSB9",
            || Err(PortError::not_found("/dev/ttyUSB9")),
            WriteMode::Bulk,
            ["/nonexistent/page.vdt"],
        );

        match result {
            Err(TransmitError::Open { device, source }) => {
                assert_eq!(device, "/dev/ttyUSB9");
                assert!(matches!(source, PortError::NotFound(_)));
            }
            other => panic!("Expected open error, got {:?}", other),
        }
    }

    #[test]
    fn test_no_files_opens_and_closes() {
        let port = MockSerialPort::new("MOCK0");
        let opened = port.clone();

        let report = transmit_with(
            "MOCK0",
            move || Ok(opened),
            WriteMode::PerByte,
            Vec::<PathBuf>::new(),
        )
        .unwrap();

        assert_eq!(report, TransmitReport::default());
        assert_eq!(port.write_calls(), 0);
        assert_eq!(port.flushes(), 1);
        assert_eq!(port.handle_count(), 1);
    }
}
