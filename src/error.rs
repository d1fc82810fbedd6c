//! Fatal errors. Per-entry failures are `ScanError`s and never end up here.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot access '{}': {}", .path.display(), .source)]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("size threshold must be greater than zero bytes")]
    InvalidThreshold,

    #[error("invalid size '{0}': {1}")]
    InvalidSize(String, String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
