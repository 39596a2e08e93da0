//! Tracing subscriber setup for the binary.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Pick the filter directive: `RUST_LOG` wins, otherwise `warn`, or `debug` with
/// `--verbose`. The interactive UI owns the terminal, so it gets `off` unless
/// verbose output was asked for.
pub fn default_directive(verbose: bool, interactive: bool) -> String {
    let level = match (verbose, interactive) {
        (true, _) => Level::DEBUG.as_str(),
        (false, true) => "off",
        (false, false) => Level::WARN.as_str(),
    };
    format!("termbase={}", level.to_lowercase())
}

/// Install the global fmt subscriber writing to stderr.
pub fn init_logging(verbose: bool, interactive: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, interactive)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }
}
