//! Structured logging for the Quasar engine via the `tracing` ecosystem.
//!
//! Console output with uptime timestamps, module targets, and severity
//! levels; filterable through `RUST_LOG` or the config's `log_level`.

use quasar_config::Config;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global tracing subscriber.
///
/// Filter precedence: the `RUST_LOG` environment variable, then the config's
/// `debug.log_level`, then `"info"`. Safe to call once per process; a second
/// call would panic in `tracing`, so callers own that invariant.
pub fn init_logging(config: Option<&Config>) {
    let fallback = config
        .map(|c| c.debug.log_level.as_str())
        .filter(|level| !level.is_empty())
        .unwrap_or("info");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();

    info!(filter = fallback, "logging initialized");
}
