//! Structured logging for the terrain pipeline via the `tracing`
//! ecosystem: console output with uptime timestamps and module targets,
//! filterable through `RUST_LOG` or a configured filter string.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor a configured level is present.
const DEFAULT_FILTER: &str = "info";

/// Initialize the global tracing subscriber.
///
/// The filter is resolved in order: the `RUST_LOG` environment variable,
/// then `configured_level` (ignored when empty), then the built-in
/// default.
///
/// Call once at startup; a second call panics because the global
/// subscriber is already set.
pub fn init_logging(configured_level: Option<&str>) {
    let fallback = match configured_level {
        Some(level) if !level.is_empty() => level.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&fallback));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

/// An `EnvFilter` with the built-in default filter string.
#[must_use]
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
