//! # Structured Logging Module
//!
//! Environment-aware console logging for render cycles and registry changes.

use crate::config::ConfigManager;
use chrono::Utc;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging with an environment-specific filter.
///
/// `RUST_LOG` wins over the environment default when set. Safe to call more
/// than once; only the first call installs a subscriber.
pub fn init_tracing() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let (environment, log_level) = environment_log_level();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(std::io::stdout().is_terminal())
                .with_filter(filter),
        );

        // Another subscriber may already be installed by the host application
        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(
            environment = %environment,
            log_level = %log_level,
            "Cells logging initialized"
        );
    });
}

/// Environment as detected by [`ConfigManager`] and its default log level
fn environment_log_level() -> (String, String) {
    let environment = ConfigManager::detect_environment();
    let log_level = get_log_level(&environment);
    (environment, log_level)
}

/// Log level based on environment
pub fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log a completed (or failed) render cycle
pub fn log_render_operation(
    component: &str,
    state: &str,
    request_id: &str,
    status: &str,
    duration_ms: Option<u64>,
    details: Option<&str>,
) {
    tracing::info!(
        component = %component,
        state = %state,
        request_id = %request_id,
        status = %status,
        duration_ms = duration_ms,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "RENDER_OPERATION"
    );
}

/// Log a registry change
pub fn log_registry_operation(
    operation: &str,
    class_name: &str,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        class_name = %class_name,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "REGISTRY_OPERATION"
    );
}
