//! Recursive size aggregation
//!
//! `SizeAggregator` computes the size of a single entry: the direct size for
//! files, the recursive sum of every non-excluded descendant for directories.
//! Failures on individual entries are recorded as [`ScanError`]s and count as
//! zero; they never abort the walk.
//!
//! The same descent is used by the coordinator, which plugs in a
//! [`SizeSink`] to see every sized entry exactly once, in post-order.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use super::classify::{Classification, classify, entry_kind};
use super::config::{LinkPolicy, ScanOptions};
use super::exclusion::ExclusionSet;
use super::types::{Aggregate, EntryKind, ScanError};

/// Receives every entry whose size has been fully computed.
///
/// Directories are reported after all of their descendants. A directory
/// whose subtree was cut short by cancellation is not reported.
pub trait SizeSink: Sync {
    fn record(&self, path: &Path, kind: EntryKind, size_bytes: u64);
}

/// Sink that discards everything.
pub struct NoopSink;

impl SizeSink for NoopSink {
    fn record(&self, _path: &Path, _kind: EntryKind, _size_bytes: u64) {}
}

/// Everything learned during one descent.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub size_bytes: u64,
    pub errors: Vec<ScanError>,
    pub entries_scanned: u64,
    pub dirs_scanned: u64,
    pub cancelled: bool,
}

pub struct SizeAggregator<'a> {
    exclusions: &'a ExclusionSet,
    options: &'a ScanOptions,
}

/// Per-descent mutable state, shared across workers.
#[derive(Default)]
struct WalkState {
    /// Canonical roots of the subtrees being counted. Under `Follow` a
    /// linked directory inside one of them is left to its physical path.
    claimed: Mutex<Vec<PathBuf>>,
    errors: Mutex<Vec<ScanError>>,
    entries_scanned: AtomicU64,
    dirs_scanned: AtomicU64,
    cancelled: AtomicBool,
}

impl WalkState {
    fn record_error(&self, error: ScanError) {
        debug!("Could not access {}", error);
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }

    /// Claim `target` for counting. Returns false when it lies inside a
    /// subtree that is already counted.
    fn claim(&self, target: &Path) -> bool {
        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        if claimed.iter().any(|root| target.starts_with(root)) {
            return false;
        }
        claimed.push(target.to_path_buf());
        true
    }

    /// Whether `path` is itself the root of a claimed subtree.
    fn is_claimed_root(&self, path: &Path) -> bool {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|root| root == path)
    }

    fn into_outcome(self, size_bytes: u64) -> WalkOutcome {
        WalkOutcome {
            size_bytes,
            errors: self
                .errors
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
            entries_scanned: self.entries_scanned.into_inner(),
            dirs_scanned: self.dirs_scanned.into_inner(),
            cancelled: self.cancelled.into_inner(),
        }
    }
}

/// Canonical paths of the directories on the current descent, innermost
/// first. Only tracked under `LinkPolicy::Follow`.
#[derive(Clone, Copy)]
struct Ancestry<'p> {
    path: &'p Path,
    parent: Option<&'p Ancestry<'p>>,
}

impl Ancestry<'_> {
    fn contains(&self, path: &Path) -> bool {
        let mut node = Some(self);
        while let Some(current) = node {
            if current.path == path {
                return true;
            }
            node = current.parent;
        }
        false
    }
}

impl<'a> SizeAggregator<'a> {
    pub fn new(exclusions: &'a ExclusionSet, options: &'a ScanOptions) -> Self {
        Self {
            exclusions,
            options,
        }
    }

    /// Size of `path` in bytes plus every error met on the way.
    ///
    /// `path` itself is not classified; only its descendants are.
    pub fn aggregate(&self, path: &Path, kind: EntryKind) -> Aggregate {
        let outcome = self.walk(path, kind, &NoopSink);
        Aggregate {
            size_bytes: outcome.size_bytes,
            errors: outcome.errors,
        }
    }

    /// Aggregate `path`, reporting every sized entry to `sink`.
    pub fn walk<S: SizeSink>(&self, path: &Path, kind: EntryKind, sink: &S) -> WalkOutcome {
        let state = WalkState::default();
        let size = match self.options.workers {
            0 | 1 => self.measure_top(path, kind, sink, &state),
            n => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(|| self.measure_top(path, kind, sink, &state)),
                Err(e) => {
                    // Fall back to rayon's global pool
                    warn!("Could not build a pool of {} workers: {}", n, e);
                    self.measure_top(path, kind, sink, &state)
                }
            },
        };
        state.into_outcome(size)
    }

    fn follows_links(&self) -> bool {
        self.options.link_policy == LinkPolicy::Follow
    }

    fn measure_top<S: SizeSink>(
        &self,
        path: &Path,
        kind: EntryKind,
        sink: &S,
        state: &WalkState,
    ) -> u64 {
        match kind {
            EntryKind::Directory if self.follows_links() => {
                let canonical = match fs::canonicalize(path) {
                    Ok(c) => c,
                    Err(e) => {
                        state.record_error(ScanError::from_io(path, &e));
                        return 0;
                    }
                };
                state.claim(&canonical);
                self.measure_dir(path, Some(canonical.as_path()), None, sink, state)
            }
            EntryKind::Directory => self.measure_dir(path, None, None, sink, state),
            _ => match fs::symlink_metadata(path) {
                Ok(metadata) => {
                    state.entries_scanned.fetch_add(1, Ordering::Relaxed);
                    self.measure_leaf(path, &metadata, None, sink, state)
                }
                Err(e) => {
                    state.record_error(ScanError::from_io(path, &e));
                    0
                }
            },
        }
    }

    /// Stat, classify and size one child entry.
    fn measure_entry<S: SizeSink>(
        &self,
        path: &Path,
        parent: Option<&Ancestry<'_>>,
        sink: &S,
        state: &WalkState,
    ) -> u64 {
        let metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(e) => {
                // Listed a moment ago, gone now
                state.record_error(ScanError::from_io(path, &e));
                return 0;
            }
        };
        let kind = entry_kind(&metadata);

        match classify(path, kind, self.exclusions) {
            Classification::Include => {}
            Classification::ExcludeWithWarning => {
                debug!("Skipping excluded path: {}", path.display());
                return 0;
            }
            Classification::ExcludeSilently => {
                trace!("Skipping hidden entry: {}", path.display());
                return 0;
            }
        }

        state.entries_scanned.fetch_add(1, Ordering::Relaxed);
        if kind != EntryKind::Directory {
            return self.measure_leaf(path, &metadata, parent, sink, state);
        }

        let canonical = parent
            .zip(path.file_name())
            .map(|(ancestry, name)| ancestry.path.join(name));
        if let Some(canonical) = &canonical {
            if state.is_claimed_root(canonical) {
                debug!("Already counted through a link: {}", path.display());
                return 0;
            }
        }
        self.measure_dir(path, canonical.as_deref(), parent, sink, state)
    }

    fn measure_leaf<S: SizeSink>(
        &self,
        path: &Path,
        metadata: &Metadata,
        parent: Option<&Ancestry<'_>>,
        sink: &S,
        state: &WalkState,
    ) -> u64 {
        let kind = entry_kind(metadata);
        if kind != EntryKind::Symlink {
            let size = metadata.len();
            sink.record(path, kind, size);
            return size;
        }

        if !self.follows_links() {
            let size = metadata.len();
            sink.record(path, EntryKind::Symlink, size);
            return size;
        }

        match fs::metadata(path) {
            Ok(target) if target.is_dir() => self.measure_linked_dir(path, parent, sink, state),
            Ok(target) => {
                let kind = if target.is_file() {
                    EntryKind::File
                } else {
                    EntryKind::Other
                };
                let size = target.len();
                sink.record(path, kind, size);
                size
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("Broken symlink: {}", path.display());
                let size = metadata.len();
                sink.record(path, EntryKind::Symlink, size);
                size
            }
            Err(e) => {
                state.record_error(ScanError::from_io(path, &e));
                0
            }
        }
    }

    /// Follow a link to a directory.
    ///
    /// A target on the current descent is a cycle and is recorded as
    /// `SymlinkLoopDetected`. A target inside an already counted subtree
    /// (the scan root included) contributes nothing and is not an error.
    fn measure_linked_dir<S: SizeSink>(
        &self,
        link: &Path,
        parent: Option<&Ancestry<'_>>,
        sink: &S,
        state: &WalkState,
    ) -> u64 {
        let target = match fs::canonicalize(link) {
            Ok(t) => t,
            Err(e) => {
                state.record_error(ScanError::from_io(link, &e));
                return 0;
            }
        };

        if parent.is_some_and(|ancestry| ancestry.contains(&target)) {
            state.record_error(ScanError::symlink_loop(link, &target));
            return 0;
        }
        if !state.claim(&target) {
            debug!(
                "Skipping {}: {} is already counted",
                link.display(),
                target.display()
            );
            return 0;
        }
        self.measure_dir(link, Some(target.as_path()), parent, sink, state)
    }

    /// Sum the children of a directory. `canonical` is set under `Follow`
    /// and extends the ancestry seen by the children.
    fn measure_dir<S: SizeSink>(
        &self,
        path: &Path,
        canonical: Option<&Path>,
        parent: Option<&Ancestry<'_>>,
        sink: &S,
        state: &WalkState,
    ) -> u64 {
        if self.options.is_cancelled() {
            state.cancelled.store(true, Ordering::Relaxed);
            return 0;
        }

        let entries = match fs::read_dir(path) {
            Ok(e) => e,
            Err(e) => {
                state.record_error(ScanError::from_io(path, &e));
                return 0;
            }
        };
        state.dirs_scanned.fetch_add(1, Ordering::Relaxed);
        trace!("Scanning directory: {}", path.display());

        let mut children = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => children.push(entry.path()),
                Err(e) => state.record_error(ScanError::from_io(path, &e)),
            }
        }
        children.sort();

        let ancestry = canonical.map(|path| Ancestry { path, parent });
        let ancestry = ancestry.as_ref();
        let total = if self.options.workers == 1 {
            children
                .iter()
                .map(|child| self.measure_entry(child, ancestry, sink, state))
                .fold(0u64, u64::saturating_add)
        } else {
            children
                .par_iter()
                .map(|child| self.measure_entry(child, ancestry, sink, state))
                .reduce(|| 0u64, u64::saturating_add)
        };

        // A cancelled subtree has a partial total; don't report it
        if state.cancelled.load(Ordering::Relaxed) || self.options.is_cancelled() {
            state.cancelled.store(true, Ordering::Relaxed);
            return total;
        }

        sink.record(path, EntryKind::Directory, total);
        total
    }
}
