//! Deterministic ordering of scan records

use std::cmp::Ordering;

use super::types::SizeRecord;

/// Sort records by size descending, then by path bytes ascending.
///
/// Paths are compared on their OS string, not locale-aware collation,
/// so equal sizes always come out in the same order.
pub fn order(mut records: Vec<SizeRecord>) -> Vec<SizeRecord> {
    records.sort_by(compare);
    records
}

pub fn compare(left: &SizeRecord, right: &SizeRecord) -> Ordering {
    right
        .size_bytes
        .cmp(&left.size_bytes)
        .then_with(|| left.path.as_os_str().cmp(right.path.as_os_str()))
}
