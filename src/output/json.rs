//! JSON output formatting

use std::io;

use crate::scan::ScanResult;

/// Serialize a scan result as pretty-printed JSON.
pub fn render_json(result: &ScanResult) -> io::Result<String> {
    serde_json::to_string_pretty(result).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{EntryKind, SizeRecord};

    #[test]
    fn test_json_carries_records_and_totals() {
        let result = ScanResult {
            records: vec![SizeRecord::new("/data/a.bin", 2048, EntryKind::File)],
            total_bytes: 2048,
            ..ScanResult::default()
        };
        let json = render_json(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_bytes"], 2048);
        assert_eq!(value["records"][0]["path"], "/data/a.bin");
        assert_eq!(value["records"][0]["kind"], "file");
        assert_eq!(value["cancelled"], false);
    }
}
