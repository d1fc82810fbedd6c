//! Size units: threshold conversion and human-readable formatting

use crate::error::{Error, Result};

pub const KB: u64 = 1024;
pub const MB: u64 = KB * 1024;
pub const GB: u64 = MB * 1024;
pub const TB: u64 = GB * 1024;

/// Unit the user gave the threshold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Megabytes,
    Gigabytes,
}

impl SizeUnit {
    pub fn bytes(self) -> u64 {
        match self {
            SizeUnit::Megabytes => MB,
            SizeUnit::Gigabytes => GB,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeUnit::Megabytes => "MB",
            SizeUnit::Gigabytes => "GB",
        }
    }
}

/// Convert a threshold like `1.5` GB into bytes.
///
/// Fractions are allowed; the result is truncated to whole bytes and must be
/// at least one byte.
pub fn threshold_bytes(value: f64, unit: SizeUnit) -> Result<u64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidSize(
            format!("{} {}", value, unit.label()),
            "must be a positive number".to_string(),
        ));
    }
    let bytes = value * unit.bytes() as f64;
    if bytes >= u64::MAX as f64 {
        return Err(Error::InvalidSize(
            format!("{} {}", value, unit.label()),
            "too large".to_string(),
        ));
    }
    match bytes as u64 {
        0 => Err(Error::InvalidThreshold),
        n => Ok(n),
    }
}

/// Format a size with the largest unit that keeps the value at least 1.
/// Cascades B → KB → MB → GB → TB.
pub fn format_size(bytes: u64) -> String {
    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
