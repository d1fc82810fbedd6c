//! Output sink: persist rendered results to a file

use std::fs;
use std::io;
use std::path::Path;

/// Write `text` to `path`, replacing any existing file.
pub fn write_to_file(path: &Path, text: &str) -> io::Result<()> {
    fs::write(path, text)
}
