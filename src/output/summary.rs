//! Footer sections: total size, cancellation note, scan errors

use std::io::{self, Write};

use termcolor::{Color, ColorSpec, WriteColor};

use crate::scan::{ScanError, ScanResult};
use crate::units::format_size;

use super::config::OutputConfig;

const RULE_WIDTH: usize = 50;

/// "Total Size Summary" block. Written only when sizes are shown and the
/// reported items add up to more than zero bytes.
pub fn write_total_summary<W: WriteColor + ?Sized>(
    out: &mut W,
    result: &ScanResult,
    config: &OutputConfig,
) -> io::Result<()> {
    if !config.show_size || result.total_bytes == 0 {
        return Ok(());
    }

    writeln!(out)?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(out, "Total Size Summary")?;
    out.reset()?;
    writeln!(out)?;
    writeln!(out, "{}", "─".repeat(RULE_WIDTH))?;
    write!(out, "Total size: ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    write!(out, "{}", format_size(result.total_bytes))?;
    out.reset()?;
    writeln!(out)?;
    Ok(())
}

pub fn write_cancelled_note<W: WriteColor + ?Sized>(
    out: &mut W,
    result: &ScanResult,
) -> io::Result<()> {
    if !result.cancelled {
        return Ok(());
    }
    writeln!(out)?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    write!(out, "Scan cancelled: results are partial")?;
    out.reset()?;
    writeln!(out)?;
    Ok(())
}

/// List of entries that could not be measured. Verbose mode only.
pub fn write_scan_errors<W: WriteColor + ?Sized>(
    out: &mut W,
    errors: &[ScanError],
    config: &OutputConfig,
) -> io::Result<()> {
    if !config.verbose || errors.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(
        out,
        "{} {} could not be read",
        errors.len(),
        if errors.len() == 1 { "entry" } else { "entries" }
    )?;
    out.reset()?;
    writeln!(out)?;
    for error in errors {
        writeln!(out, "  {}", error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::ScanErrorKind;
    use std::path::PathBuf;
    use termcolor::NoColor;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut NoColor<Vec<u8>>) -> io::Result<()>,
    {
        let mut out = NoColor::new(Vec::new());
        f(&mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_total_summary_uses_size_cascade() {
        let result = ScanResult {
            total_bytes: 2_000_000_000,
            ..ScanResult::default()
        };
        let text = render(|out| write_total_summary(out, &result, &OutputConfig::default()));
        assert!(text.contains("Total Size Summary"));
        assert!(text.contains(&"─".repeat(50)));
        assert!(text.ends_with("Total size: 1.86 GB\n"));
    }

    #[test]
    fn test_total_summary_skipped_when_empty_or_sizes_hidden() {
        let empty = ScanResult::default();
        assert!(render(|out| write_total_summary(out, &empty, &OutputConfig::default())).is_empty());

        let result = ScanResult {
            total_bytes: 10,
            ..ScanResult::default()
        };
        let config = OutputConfig {
            show_size: false,
            ..OutputConfig::default()
        };
        assert!(render(|out| write_total_summary(out, &result, &config)).is_empty());
    }

    #[test]
    fn test_errors_listed_only_when_verbose() {
        let errors = vec![ScanError {
            path: PathBuf::from("/d/locked"),
            kind: ScanErrorKind::PermissionDenied,
            message: "Permission denied (os error 13)".to_string(),
        }];
        let quiet = render(|out| write_scan_errors(out, &errors, &OutputConfig::default()));
        assert!(quiet.is_empty());

        let config = OutputConfig {
            verbose: true,
            ..OutputConfig::default()
        };
        let loud = render(|out| write_scan_errors(out, &errors, &config));
        assert!(loud.contains("1 entry could not be read"));
        assert!(loud.contains("/d/locked: permission denied"));
    }

    #[test]
    fn test_cancelled_note() {
        let result = ScanResult {
            cancelled: true,
            ..ScanResult::default()
        };
        assert!(render(|out| write_cancelled_note(out, &result)).contains("partial"));
        assert!(render(|out| write_cancelled_note(out, &ScanResult::default())).is_empty());
    }
}
