//! Scan entry point: walk a root, filter by size and mode, sort the result

use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

use super::aggregate::{SizeAggregator, SizeSink};
use super::classify::{Classification, classify_root};
use super::config::{ScanMode, ScanOptions};
use super::exclusion::ExclusionSet;
use super::ordering::order;
use super::threshold::{ModePredicate, include};
use super::types::{EntryKind, ScanError, ScanResult, SizeRecord};

/// Collects entries that pass the threshold filter.
struct ThresholdSink {
    threshold_bytes: u64,
    predicate: ModePredicate,
    records: Mutex<Vec<SizeRecord>>,
}

impl ThresholdSink {
    fn new(threshold_bytes: u64, predicate: ModePredicate) -> Self {
        Self {
            threshold_bytes,
            predicate,
            records: Mutex::new(Vec::new()),
        }
    }

    fn into_records(self) -> Vec<SizeRecord> {
        self.records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl SizeSink for ThresholdSink {
    fn record(&self, path: &Path, kind: EntryKind, size_bytes: u64) {
        if !include(
            size_bytes,
            self.threshold_bytes,
            path,
            kind,
            &self.predicate,
        ) {
            return;
        }
        debug!(
            "Found large {}: {} ({} bytes)",
            kind.as_str(),
            path.display(),
            size_bytes
        );
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SizeRecord::new(path, size_bytes, kind));
    }
}

/// Errors are listed by path, then kind, then message, so repeated scans
/// print them in the same order whatever the worker count.
fn sort_errors(errors: &mut [ScanError]) {
    errors.sort_by(|a, b| {
        (&a.path, a.kind.as_str(), &a.message).cmp(&(&b.path, b.kind.as_str(), &b.message))
    });
}

/// Scan `root` for entries of `mode` whose size is at least `threshold_bytes`.
///
/// Only an unusable root or a zero threshold is fatal. Everything that goes
/// wrong below the root lands in `ScanResult::errors`. In `Dirs` mode every
/// directory, the root included, is judged on its own aggregate size, so a
/// large directory and a large child of it are both reported.
pub fn scan(
    root: &Path,
    mode: ScanMode,
    threshold_bytes: u64,
    exclusions: &ExclusionSet,
    options: &ScanOptions,
) -> Result<ScanResult> {
    if threshold_bytes == 0 {
        return Err(Error::InvalidThreshold);
    }

    let metadata = fs::metadata(root).map_err(|source| Error::InvalidRoot {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }
    // Exclusion paths are absolute
    let root = fs::canonicalize(root).map_err(|source| Error::InvalidRoot {
        path: root.to_path_buf(),
        source,
    })?;
    let root = root.as_path();

    let started = Instant::now();
    info!(
        "Scanning {} for {} of at least {} bytes",
        root.display(),
        mode,
        threshold_bytes
    );

    if classify_root(root, exclusions) == Classification::ExcludeWithWarning {
        warn!("Scan root {} is excluded; nothing to do", root.display());
        return Ok(ScanResult {
            elapsed_ms: started.elapsed().as_millis(),
            ..ScanResult::default()
        });
    }

    let predicate = ModePredicate::new(mode, options.video_extensions.clone());
    let sink = ThresholdSink::new(threshold_bytes, predicate);
    let aggregator = SizeAggregator::new(exclusions, options);
    let outcome = aggregator.walk(root, EntryKind::Directory, &sink);

    let records = order(sink.into_records());
    let total_bytes = records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.size_bytes));

    let mut errors = outcome.errors;
    sort_errors(&mut errors);

    if outcome.cancelled {
        warn!("Scan cancelled; returning partial results");
    }
    info!(
        "Search completed in {:.2}s. Found {} items matching criteria ({} errors)",
        started.elapsed().as_secs_f64(),
        records.len(),
        errors.len()
    );

    Ok(ScanResult {
        records,
        errors,
        cancelled: outcome.cancelled,
        total_bytes,
        entries_scanned: outcome.entries_scanned,
        dirs_scanned: outcome.dirs_scanned,
        elapsed_ms: started.elapsed().as_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::config::CancelToken;
    use crate::scan::types::ScanErrorKind;
    use std::io;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, len: usize) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![b'x'; len]).unwrap();
    }

    #[test]
    fn test_zero_threshold_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = scan(
            dir.path(),
            ScanMode::Files,
            0,
            &ExclusionSet::empty(),
            &ScanOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidThreshold));
    }

    #[test]
    fn test_missing_root_is_invalid() {
        let dir = TempDir::new().unwrap();
        let err = scan(
            &dir.path().join("nope"),
            ScanMode::Files,
            1,
            &ExclusionSet::empty(),
            &ScanOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidRoot { .. }));
    }

    #[test]
    fn test_file_root_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "f.txt", 3);
        let err = scan(
            &dir.path().join("f.txt"),
            ScanMode::Files,
            1,
            &ExclusionSet::empty(),
            &ScanOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotADirectory(_)));
    }

    #[test]
    fn test_files_mode_never_reports_directories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "big/one.bin", 50);
        write(dir.path(), "small.bin", 5);
        let root = dir.path().canonicalize().unwrap();

        let result = scan(
            &root,
            ScanMode::Files,
            10,
            &ExclusionSet::empty(),
            &ScanOptions::default(),
        )
        .unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].path, root.join("big/one.bin"));
        assert_eq!(result.records[0].kind, EntryKind::File);
        assert_eq!(result.total_bytes, 50);
    }

    #[test]
    fn test_dirs_mode_reports_nested_directories_independently() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "outer/a.bin", 30);
        write(dir.path(), "outer/inner/b.bin", 20);
        let root = dir.path().canonicalize().unwrap();

        let result = scan(
            &root,
            ScanMode::Dirs,
            20,
            &ExclusionSet::empty(),
            &ScanOptions::default(),
        )
        .unwrap();
        let paths: Vec<_> = result.records.iter().map(|r| r.path.clone()).collect();
        assert_eq!(
            paths,
            vec![root.clone(), root.join("outer"), root.join("outer/inner")]
        );
        assert_eq!(result.records[0].size_bytes, 50);
        assert_eq!(result.records[2].size_bytes, 20);
    }

    #[test]
    fn test_excluded_root_yields_empty_result() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.bin", 50);
        let set = ExclusionSet::builder()
            .exclude_path(dir.path().canonicalize().unwrap())
            .build();

        let result = scan(
            dir.path(),
            ScanMode::Files,
            1,
            &set,
            &ScanOptions::default(),
        )
        .unwrap();
        assert!(result.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_cancelled_scan_returns_partial_marker() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.bin", 50);
        let token = CancelToken::new();
        token.cancel();
        let options = ScanOptions::default().with_cancel(token);

        let result = scan(
            dir.path(),
            ScanMode::Files,
            1,
            &ExclusionSet::empty(),
            &options,
        )
        .unwrap();
        assert!(result.cancelled);
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_relative_root_is_matched_against_absolute_exclusions() {
        let dir = tempfile::Builder::new()
            .prefix("scan-root")
            .tempdir_in(".")
            .unwrap();
        write(dir.path(), "keep/a.bin", 50);
        write(dir.path(), "skip/b.bin", 50);
        let relative = Path::new(".").join(dir.path().file_name().unwrap());
        assert!(relative.is_relative());
        let absolute = dir.path().canonicalize().unwrap();
        let set = ExclusionSet::builder()
            .exclude_path(absolute.join("skip"))
            .build();

        let result = scan(
            &relative,
            ScanMode::Files,
            1,
            &set,
            &ScanOptions::default(),
        )
        .unwrap();
        let paths: Vec<_> = result.records.iter().map(|r| r.path.clone()).collect();
        assert_eq!(paths, vec![absolute.join("keep/a.bin")]);
        assert!(paths.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_errors_on_same_path_sort_by_kind_then_message() {
        let path = Path::new("/data/x");
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        let mut errors = vec![
            ScanError::symlink_loop(path, Path::new("/data/b")),
            ScanError::from_io(Path::new("/data/w"), &denied),
            ScanError::symlink_loop(path, Path::new("/data/a")),
            ScanError::from_io(path, &denied),
        ];
        let mut reversed = errors.clone();
        reversed.reverse();

        sort_errors(&mut errors);
        sort_errors(&mut reversed);
        assert_eq!(errors, reversed);
        assert_eq!(errors[0].path, Path::new("/data/w"));
        assert_eq!(errors[1].kind, ScanErrorKind::PermissionDenied);
        assert_eq!(errors[2].kind, ScanErrorKind::SymlinkLoopDetected);
        assert!(errors[2].message.ends_with("/data/a"));
        assert!(errors[3].message.ends_with("/data/b"));
    }
}
