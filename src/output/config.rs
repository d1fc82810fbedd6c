//! Output configuration types

/// How a finished scan is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Bordered table with a location and a size column
    #[default]
    Table,
    /// One entry per line, `path<TAB>size`
    Plain,
    Json,
}

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
    pub format: OutputFormat,
    /// Show the size column and the total summary
    pub show_size: bool,
    /// List the per-entry scan errors after the results
    pub verbose: bool,
}

impl OutputConfig {
    /// Same layout with styling stripped, for writing to files.
    pub fn without_color(&self) -> Self {
        Self {
            use_color: false,
            ..self.clone()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            format: OutputFormat::Table,
            show_size: true,
            verbose: false,
        }
    }
}
