//! Logging setup for Faultline
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a fmt
//! layer. Every request runs inside a span carrying its trace id, so the id
//! shows up on each line emitted while the request is handled.

use faultline_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber and route panics through it
///
/// Filter precedence: `RUST_LOG`, then `telemetry.filter`, then
/// `default_filter`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, default_filter: &str) -> anyhow::Result<()> {
    let filter = build_filter(config, default_filter);
    let format = config.map(|c| c.format).unwrap_or_default();

    tracing_subscriber::registry()
        .with(fmt_layer(format))
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    install_panic_hook();

    if let Some(config) = config {
        tracing::debug!(service = %config.service_name, ?format, "telemetry initialized");
    }

    Ok(())
}

/// Replace the default panic hook with one that logs through `tracing`
///
/// The hook runs on the panicking thread inside the current span, so a
/// panic in a request handler is logged with that request's trace id
/// instead of going straight to stderr.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("non-string panic payload");
        let location = info.location().map(ToString::to_string);

        tracing::error!(
            panic = message,
            location = location.as_deref().unwrap_or("-"),
            "thread panicked"
        );
    }));
}

fn build_filter(config: Option<&TelemetryConfig>, default_filter: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    config
        .and_then(|c| c.filter.as_deref())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(default_filter).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().with_current_span(true).with_span_list(false).boxed(),
    }
}
