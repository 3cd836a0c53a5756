//! Tracing initialization for the command-line tool.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g.
/// `CORR_EASY_LOG=corr_easy=debug`.
pub const LOG_ENV: &str = "CORR_EASY_LOG";

/// Installs a stderr subscriber filtered by [`LOG_ENV`], falling back to
/// `default_filter` when the variable is unset or invalid.
///
/// Only the first call has an effect.
pub fn init_tracing(default_filter: &str) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
