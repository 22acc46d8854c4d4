// src/infra/logger.rs — Structured logging with tracing

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over `level`.
///
/// Output goes to stderr so it never interleaves with chat transcripts
/// printed on stdout.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Like [`init_logging`], but bumps the default to `debug` when `verbose`.
pub fn init_for_cli(verbose: bool) {
    init_logging(if verbose { "debug" } else { "warn" });
}
