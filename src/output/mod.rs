//! Result presentation
//!
//! A finished `ScanResult` is rendered in one of three formats:
//! - a bordered table (`table`)
//! - plain text, one entry per line (`plain`)
//! - JSON (`json`)
//!
//! Table and plain output are followed by the footer sections in `summary`.
//! `sink` persists rendered text to a file.

mod config;
mod json;
mod plain;
mod sink;
mod summary;
mod table;

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::scan::ScanResult;

pub use config::{OutputConfig, OutputFormat};
pub use json::render_json;
pub use plain::write_plain;
pub use sink::write_to_file;
pub use summary::{write_cancelled_note, write_scan_errors, write_total_summary};
pub use table::create_results_table;

/// Write the full report for `result` in the configured format.
pub fn write_report<W: WriteColor + ?Sized>(
    out: &mut W,
    result: &ScanResult,
    config: &OutputConfig,
) -> io::Result<()> {
    match config.format {
        OutputFormat::Json => {
            writeln!(out, "{}", render_json(result)?)?;
            return Ok(());
        }
        OutputFormat::Table => {
            writeln!(out, "{}", create_results_table(&result.records, config))?;
        }
        OutputFormat::Plain => write_plain(out, &result.records, config)?,
    }

    write_total_summary(out, result, config)?;
    write_cancelled_note(out, result)?;
    write_scan_errors(out, &result.errors, config)?;
    Ok(())
}

/// Render the report as unstyled text, as written by the output sink.
pub fn render_report(result: &ScanResult, config: &OutputConfig) -> io::Result<String> {
    let mut out = NoColor::new(Vec::new());
    write_report(&mut out, result, &config.without_color())?;
    Ok(String::from_utf8_lossy(&out.into_inner()).into_owned())
}

/// Print the report to stdout.
pub fn print_report(result: &ScanResult, config: &OutputConfig) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color_choice(config.use_color));
    write_report(&mut stdout, result, config)?;
    stdout.flush()
}

/// Progress line on stderr, kept off stdout so results can be piped.
pub fn print_status(message: &str, use_color: bool) -> io::Result<()> {
    let mut stderr = StandardStream::stderr(color_choice(use_color));
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    write!(stderr, "{}", message)?;
    stderr.reset()?;
    writeln!(stderr)
}

pub fn print_success(message: &str, use_color: bool) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color_choice(use_color));
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    write!(stdout, "{}", message)?;
    stdout.reset()?;
    writeln!(stdout)
}

fn color_choice(use_color: bool) -> ColorChoice {
    if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{EntryKind, ScanError, ScanErrorKind, SizeRecord};
    use std::path::PathBuf;

    fn sample_result() -> ScanResult {
        ScanResult {
            records: vec![
                SizeRecord::new("/d/a.txt", 2_000_000_000, EntryKind::File),
                SizeRecord::new("/d/c.txt", 1_500_000_000, EntryKind::File),
            ],
            errors: vec![ScanError {
                path: PathBuf::from("/d/locked"),
                kind: ScanErrorKind::PermissionDenied,
                message: "Permission denied (os error 13)".to_string(),
            }],
            total_bytes: 3_500_000_000,
            ..ScanResult::default()
        }
    }

    #[test]
    fn test_rendered_table_report_has_no_escape_codes() {
        let text = render_report(&sample_result(), &OutputConfig::default()).unwrap();
        assert!(!text.contains('\u{1b}'));
        assert!(text.contains("/d/a.txt"));
        assert!(text.contains("Total size: 3.26 GB"));
        let a = text.find("/d/a.txt").unwrap();
        let c = text.find("/d/c.txt").unwrap();
        assert!(a < c);
    }

    #[test]
    fn test_plain_report_with_verbose_errors() {
        let config = OutputConfig {
            format: OutputFormat::Plain,
            verbose: true,
            ..OutputConfig::default()
        };
        let text = render_report(&sample_result(), &config).unwrap();
        assert!(text.starts_with("/d/a.txt\t1.86 GB\n/d/c.txt\t1.40 GB\n"));
        assert!(text.contains("1 entry could not be read"));
    }

    #[test]
    fn test_json_report_is_only_json() {
        let config = OutputConfig {
            format: OutputFormat::Json,
            ..OutputConfig::default()
        };
        let text = render_report(&sample_result(), &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["records"].as_array().unwrap().len(), 2);
        assert!(!text.contains("Total Size Summary"));
    }
}
