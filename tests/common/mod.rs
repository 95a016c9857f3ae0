//! Shared test utilities for vdt-send integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;

/// A Videotex page: clear screen, cursor home, a line of text.
pub const SAMPLE_PAGE: &[u8] = b"\x0c\x1e\x1b\x46BIENVENUE SUR 3615\r\n";

/// Write each `(name, contents)` pair into a fresh temp dir.
///
/// Returns the dir (keep it alive) and the paths in the given order.
pub fn write_inputs(files: &[(&str, &[u8])]) -> (TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let paths = files
        .iter()
        .map(|(name, contents)| {
            let path = dir.path().join(name);
            std::fs::write(&path, contents).expect("write input file");
            path
        })
        .collect();
    (dir, paths)
}
