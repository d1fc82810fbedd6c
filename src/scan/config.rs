//! Configuration types for a single scan

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

/// Extensions treated as video files when none are configured.
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp", "3g2", "m2ts",
    "mts", "ts", "vob", "ogv", "rm", "rmvb", "asf", "divx",
];

/// Which entry kind is eligible for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Files,
    Dirs,
    Videos,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanMode::Files => "files",
            ScanMode::Dirs => "dirs",
            ScanMode::Videos => "videos",
        };
        f.write_str(name)
    }
}

/// How symlinks are treated during the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkPolicy {
    /// Count the link's own size, never descend through it
    #[default]
    Physical,
    /// Resolve links; a visited set of canonical paths guarantees termination
    Follow,
}

/// Shared flag used to stop a running scan from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options controlling one scan invocation.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub link_policy: LinkPolicy,
    /// Lowercase extensions without the leading dot
    pub video_extensions: HashSet<String>,
    /// Number of parallel workers for sibling aggregation.
    /// 0 = auto-detect (rayon's global pool)
    /// 1 = sequential (no parallelism)
    /// N = use N worker threads
    pub workers: usize,
    pub cancel: Option<CancelToken>,
}

impl ScanOptions {
    pub fn with_video_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.video_extensions = normalize_extensions(extensions);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            link_policy: LinkPolicy::Physical,
            video_extensions: normalize_extensions(DEFAULT_VIDEO_EXTENSIONS),
            workers: 1,
            cancel: None,
        }
    }
}

/// Lowercase and strip a leading dot, so ".MKV" and "mkv" are the same entry.
pub fn normalize_extensions<I, S>(extensions: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
