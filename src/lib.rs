//! find-large - Find the largest files, directories and videos under a directory

pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod scan;
pub mod units;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::{AppConfig, load_configuration};
pub use error::{Error, Result};
pub use output::{OutputConfig, OutputFormat, print_report, render_report};
pub use scan::{
    CancelToken, EntryKind, ExclusionSet, LinkPolicy, ScanError, ScanErrorKind, ScanMode,
    ScanOptions, ScanResult, SizeRecord, scan,
};
pub use units::{SizeUnit, format_size, threshold_bytes};
