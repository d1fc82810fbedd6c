//! CLI entry point for find-large

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::warn;

use find_large::logging::init_logging;
use find_large::output::{print_status, print_success, write_to_file};
use find_large::{
    AppConfig, CancelToken, Error, OutputConfig, OutputFormat, ScanMode, SizeUnit,
    format_size, load_configuration, print_report, render_report, scan, threshold_bytes,
};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // https://no-color.org/
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "find-large")]
#[command(about = "Find the largest files, directories and videos under a directory")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find files at least as large as the threshold
    Files(ScanArgs),
    /// Find directories whose total size reaches the threshold
    Dirs(ScanArgs),
    /// Find video files at least as large as the threshold
    #[command(alias = "videos")]
    Vids(ScanArgs),
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Directory to search
    #[arg(short = 'd', long = "directory", default_value = ".")]
    directory: PathBuf,

    /// Minimum size in gigabytes (default: 1)
    #[arg(
        short = 'S',
        long = "size-in-gb",
        value_name = "GB",
        conflicts_with = "size_in_mb"
    )]
    size_in_gb: Option<f64>,

    /// Minimum size in megabytes
    #[arg(short = 's', long = "size-in-mb", value_name = "MB")]
    size_in_mb: Option<f64>,

    /// Write results to FILE instead of the terminal
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Show locations only
    #[arg(short = 'n', long = "no-size")]
    no_size: bool,

    /// Plain text output, one entry per line
    #[arg(long = "no-table", conflicts_with = "json")]
    no_table: bool,

    /// Output in JSON format
    #[arg(long = "json")]
    json: bool,

    /// Debug logging and a list of entries that could not be read
    #[arg(short, long)]
    verbose: bool,

    /// Skip entries with this name or glob (can be used multiple times)
    #[arg(short = 'I', long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Scan this hidden name anyway (can be used multiple times)
    #[arg(long = "allow-hidden", value_name = "NAME")]
    allow_hidden: Vec<String>,

    /// Follow symbolic links
    #[arg(short = 'L', long = "follow-links")]
    follow_links: bool,

    /// Match excluded paths and names case-insensitively
    #[arg(long = "case-insensitive")]
    case_insensitive: bool,

    /// Number of parallel workers
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,

    /// Stop the scan after DURATION and show partial results
    /// Duration format: 30s, 5m, 1h
    #[arg(long = "timeout", value_name = "DURATION")]
    timeout: Option<String>,

    /// Extra configuration file (TOML, YAML or JSON)
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,
}

impl ScanArgs {
    fn threshold(&self) -> (f64, SizeUnit) {
        match (self.size_in_gb, self.size_in_mb) {
            (_, Some(mb)) => (mb, SizeUnit::Megabytes),
            (Some(gb), None) => (gb, SizeUnit::Gigabytes),
            (None, None) => (1.0, SizeUnit::Gigabytes),
        }
    }

    fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.no_table {
            OutputFormat::Plain
        } else {
            OutputFormat::Table
        }
    }

    /// Command-line flags extend or override the loaded configuration.
    fn apply_to(&self, config: &mut AppConfig) {
        config.exclude_names.extend(self.exclude.iter().cloned());
        config
            .hidden_allow_list
            .extend(self.allow_hidden.iter().cloned());
        if self.follow_links {
            config.follow_links = true;
        }
        if self.case_insensitive {
            config.case_insensitive = true;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
    }
}

/// Parse a duration string like "30s", "5m" into a Duration.
fn parse_duration_string(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim()).map_err(|e| e.to_string())
}

fn mode_noun(mode: ScanMode) -> &'static str {
    match mode {
        ScanMode::Files => "files",
        ScanMode::Dirs => "directories",
        ScanMode::Videos => "videos",
    }
}

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        // --help and --version
        if !e.use_stderr() {
            e.exit();
        }
        eprint!("{}", e);
        process::exit(1);
    });

    let (mode, args) = match cli.command {
        Command::Files(args) => (ScanMode::Files, args),
        Command::Dirs(args) => (ScanMode::Dirs, args),
        Command::Vids(args) => (ScanMode::Videos, args),
    };

    let use_color = should_use_color(args.color);
    init_logging(args.verbose, use_color);

    let timeout = args.timeout.as_ref().map(|s| {
        parse_duration_string(s).unwrap_or_else(|e| {
            eprintln!("find-large: invalid --timeout duration '{}': {}", s, e);
            process::exit(1);
        })
    });

    if let Err(e) = run(mode, &args, timeout, use_color) {
        eprintln!("find-large: {}", e);
        process::exit(1);
    }
}

fn run(
    mode: ScanMode,
    args: &ScanArgs,
    timeout: Option<Duration>,
    use_color: bool,
) -> find_large::Result<()> {
    let (value, unit) = args.threshold();
    let threshold = threshold_bytes(value, unit)?;

    let root = args
        .directory
        .canonicalize()
        .map_err(|source| Error::InvalidRoot {
            path: args.directory.clone(),
            source,
        })?;

    let mut app_config = load_configuration(args.config.as_deref())?;
    args.apply_to(&mut app_config);
    let exclusions = app_config.exclusion_set();

    let token = CancelToken::new();
    {
        let token = token.clone();
        if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
            warn!("Cannot install Ctrl-C handler: {}", e);
        }
    }
    if let Some(limit) = timeout {
        let token = token.clone();
        thread::spawn(move || {
            thread::sleep(limit);
            warn!(
                "Timeout of {} reached; stopping scan",
                humantime::format_duration(limit)
            );
            token.cancel();
        });
    }
    let options = app_config.scan_options().with_cancel(token);

    let output_config = OutputConfig {
        use_color,
        format: args.output_format(),
        show_size: !args.no_size,
        verbose: args.verbose,
    };

    if output_config.format != OutputFormat::Json {
        print_status(
            &format!(
                "Searching for {} larger than {} in {}...",
                mode_noun(mode),
                format_size(threshold),
                root.display()
            ),
            use_color,
        )?;
    }

    let result = scan(&root, mode, threshold, &exclusions, &options)?;

    match &args.output {
        Some(path) => {
            let text = render_report(&result, &output_config)?;
            write_to_file(path, &text)?;
            print_success(&format!("Results saved to {}", path.display()), use_color)?;
        }
        None => print_report(&result, &output_config)?,
    }

    Ok(())
}
