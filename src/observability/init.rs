//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber with OpenTelemetry integration,
//! setting up the complete observability pipeline from `tracing` macros to file
//! export.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name attached to every exported span.
const SERVICE_NAME: &str = "linkdeck";

/// Initializes the tracing subscriber with file-based OTLP export.
///
/// Sets up a tracing subscriber pipeline that:
/// 1. Filters spans based on configured trace level
/// 2. Exports spans to OpenTelemetry
/// 3. Serializes spans to OTLP JSON format
/// 4. Writes to rotating file with backups
///
/// # Parameters
///
/// * `config` - Plugin configuration containing `trace_level` option
///
/// # Trace Level Resolution
///
/// Level is determined by:
/// 1. `RUST_LOG` environment variable if set and valid
/// 2. `config.trace_level` if set
/// 3. Default: `"info"`
///
/// # File Location
///
/// Traces are written to: `~/.local/share/zellij/linkdeck/linkdeck-otlp.json`
///
/// The plugin sees this as `/host/.local/share/zellij/linkdeck` in Zellij's
/// sandbox environment.
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Returns without installing a subscriber if directory creation fails
///   (the plugin runs fine without traces)
/// - Idempotent: safe to call multiple times (only the first call takes effect)
///
/// # Example
///
/// ```rust
/// use linkdeck::observability::init_tracing;
/// use linkdeck::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let data_dir = crate::infrastructure::paths::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        SERVICE_NAME,
    )]);

    let trace_file = data_dir.join("linkdeck-otlp.json");
    let provider = tracer::create_tracer_provider(trace_file, resource);

    let tracer = provider.tracer(SERVICE_NAME);
    let otel_layer = OpenTelemetryLayer::new(tracer);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer);

    let _ = subscriber.try_init();
}
