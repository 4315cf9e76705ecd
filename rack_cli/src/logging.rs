//! Log setup for the CLI.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging.
///
/// `RUST_LOG` overrides the level (default: `info`, or `debug` with
/// `--verbose`). Logs go to stderr so stdout stays valid JSON.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}
