//! Diagnostic logging setup

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `chronomind=debug`)
pub const LOG_ENV: &str = "CHRONOMIND_LOG";

/// Install the global tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays parseable. Colour is
/// only used when stderr is a terminal. Calling this twice is harmless; the
/// second install is ignored.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_level(true)
        .compact()
        .try_init();
}
