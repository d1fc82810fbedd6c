//! Size-aggregation tree walker
//!
//! This module finds entries whose size meets a byte threshold under a root
//! directory. It is split into small pieces that are usable on their own:
//!
//! - `classify`: include/exclude decisions and entry kinds
//! - `aggregate`: cycle-safe, failure-tolerant recursive sizing
//! - `threshold`: size boundary plus mode predicate
//! - `ordering`: deterministic result order
//! - `coordinator`: the `scan` entry point tying it together

mod aggregate;
mod classify;
mod config;
mod coordinator;
mod exclusion;
mod ordering;
mod threshold;
mod types;

pub use aggregate::{NoopSink, SizeAggregator, SizeSink, WalkOutcome};
pub use classify::{Classification, classify, classify_root, entry_kind};
pub use config::{
    CancelToken, DEFAULT_VIDEO_EXTENSIONS, LinkPolicy, ScanMode, ScanOptions,
    normalize_extensions,
};
pub use coordinator::scan;
pub use exclusion::{ExclusionSet, ExclusionSetBuilder};
pub use ordering::{compare, order};
pub use threshold::{ModePredicate, include};
pub use types::{
    Aggregate, EntryKind, ScanError, ScanErrorKind, ScanResult, SizeRecord,
};
