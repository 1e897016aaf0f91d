//! Logging initialization.
//!
//! Diagnostics meant for the user are written directly by the interpreter; the
//! `tracing` output configured here is developer-facing and silent by default so it
//! never mixes into them.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Variable holding the filter directives, e.g. `HSH_LOG=hsh=debug`.
pub const LOG_ENV_VAR: &str = "HSH_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("off"))
}

/// Initialize the logging system.
///
/// # Panics
///
/// Panics if a global tracing subscriber has already been set.
pub fn init() {
    try_init().expect("a global tracing subscriber is already set");
}

/// Try to initialize the logging system.
///
/// Returns `Err` if logging has already been initialized.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init()
}
