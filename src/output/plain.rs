//! Plain text presenter, one entry per line

use std::io::{self, Write};

use crate::scan::SizeRecord;
use crate::units::format_size;

use super::config::OutputConfig;

pub fn write_plain<W: Write + ?Sized>(
    out: &mut W,
    records: &[SizeRecord],
    config: &OutputConfig,
) -> io::Result<()> {
    for record in records {
        if config.show_size {
            writeln!(
                out,
                "{}\t{}",
                record.path.display(),
                format_size(record.size_bytes)
            )?;
        } else {
            writeln!(out, "{}", record.path.display())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::EntryKind;

    #[test]
    fn test_plain_lines_are_tab_separated() {
        let records = vec![
            SizeRecord::new("/d/big", 3 * 1024 * 1024, EntryKind::Directory),
            SizeRecord::new("/d/small", 500, EntryKind::File),
        ];
        let mut out = Vec::new();
        write_plain(&mut out, &records, &OutputConfig::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "/d/big\t3.00 MB\n/d/small\t500 B\n"
        );
    }

    #[test]
    fn test_plain_locations_only() {
        let records = vec![SizeRecord::new("/d/big", 10, EntryKind::File)];
        let config = OutputConfig {
            show_size: false,
            ..OutputConfig::default()
        };
        let mut out = Vec::new();
        write_plain(&mut out, &records, &config).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/d/big\n");
    }
}
