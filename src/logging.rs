use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber used by both binaries.
///
/// The level comes from `RUST_LOG` and defaults to `warn`, so only warnings and
/// errors show up unless asked for; progress output goes through [`crate::Reporter`].
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .compact()
        .finish();
    // a subscriber may already be set when running under a test harness
    let _ = tracing::subscriber::set_global_default(subscriber);
}
