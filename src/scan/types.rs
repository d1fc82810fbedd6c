//! Value types produced by a scan

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Kind of a filesystem entry as seen by `symlink_metadata`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// FIFOs, sockets, device nodes
    Other,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symlink",
            EntryKind::Other => "other",
        }
    }
}

/// One reported entry. Sizes are always bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeRecord {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub kind: EntryKind,
}

impl SizeRecord {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            size_bytes,
            kind,
        }
    }
}

/// Reason a single entry could not be measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanErrorKind {
    PermissionDenied,
    EntryVanished,
    SymlinkLoopDetected,
    OtherIoError,
}

impl ScanErrorKind {
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => ScanErrorKind::PermissionDenied,
            io::ErrorKind::NotFound => ScanErrorKind::EntryVanished,
            _ => ScanErrorKind::OtherIoError,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScanErrorKind::PermissionDenied => "permission denied",
            ScanErrorKind::EntryVanished => "entry vanished",
            ScanErrorKind::SymlinkLoopDetected => "symlink loop detected",
            ScanErrorKind::OtherIoError => "I/O error",
        }
    }
}

/// Non-fatal failure recorded for one path. Never aborts the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanError {
    pub path: PathBuf,
    pub kind: ScanErrorKind,
    pub message: String,
}

impl ScanError {
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: ScanErrorKind::from_io(err),
            message: err.to_string(),
        }
    }

    pub fn symlink_loop(path: &Path, target: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: ScanErrorKind::SymlinkLoopDetected,
            message: format!("links back to enclosing directory {}", target.display()),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.path.display(),
            self.kind.as_str(),
            self.message
        )
    }
}

/// Size of one entry plus every error met while computing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub size_bytes: u64,
    pub errors: Vec<ScanError>,
}

/// Finished output of a scan, handed to the presenter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    /// Sorted by size descending, then path ascending
    pub records: Vec<SizeRecord>,
    pub errors: Vec<ScanError>,
    /// Set when the scan stopped early; records are partial
    pub cancelled: bool,
    /// Sum of the reported record sizes
    pub total_bytes: u64,
    pub entries_scanned: u64,
    pub dirs_scanned: u64,
    pub elapsed_ms: u128,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
