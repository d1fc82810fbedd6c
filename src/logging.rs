//! Diagnostic logging setup for the binary

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// results. `RUST_LOG` wins over the verbosity flag when set.
pub fn init_logging(verbose: bool, use_color: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second init (e.g. from tests) is not an error worth reporting.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .with_ansi(use_color),
        )
        .with(filter_layer)
        .try_init();
}
