use tracing::dispatcher;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "GACTIFS_LOG";

/// Install the stderr subscriber.
///
/// Filter directives come from `GACTIFS_LOG` (e.g. `gactifs=debug`); the
/// default only shows warnings so command output stays clean. Does nothing if
/// a subscriber is already installed.
pub fn init_logging() {
    if dispatcher::has_been_set() {
        return;
    }

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
