//! Tracing setup.
//!
//! `WRAPGEN_LOG` takes precedence over `RUST_LOG`; both use the usual
//! `EnvFilter` syntax (e.g. `debug`, `wrapgen::wrap=trace`). Without either,
//! the level follows the `-v` count. Output always goes to stderr so it never
//! mixes with generated code written to stdout.

use tracing_subscriber::EnvFilter;

/// Level name for a `-v` count
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_filter(verbosity: u8) -> EnvFilter {
    if let Ok(val) = std::env::var("WRAPGEN_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level_for_verbosity(verbosity))
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_tracing(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
