//! # Structured Logging Module
//!
//! Environment-aware console logging using the tracing ecosystem. Logs go to
//! stdout; ANSI colors only when stdout is a terminal.
//!
//! Level resolution, first match wins:
//! 1. `RUST_LOG`
//! 2. `logging.level` from configuration
//! 3. environment default (`test`/`development` → debug, `production` → info)
//!
//! The environment is whatever the configuration was loaded for, so a
//! `--environment` flag and `PROVISIONER_ENV` resolve the same way.

use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging. Safe to call more than once.
pub fn init_tracing(config: &LoggingConfig, environment: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = build_filter(config, environment);
        let use_ansi = IsTerminal::is_terminal(&std::io::stdout());

        let console_layer = match config.format {
            LogFormat::Pretty => fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(use_ansi)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(filter)
                .boxed(),
        };

        // A subscriber may already be installed by an embedding process or a test harness
        if tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %environment,
                ansi_colors = use_ansi,
                format = ?config.format,
                "Structured logging initialized"
            );
        }
    });
}

fn build_filter(config: &LoggingConfig, environment: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(configured_level(config, environment))
}

/// Level used when `RUST_LOG` is unset
fn configured_level(config: &LoggingConfig, environment: &str) -> String {
    config
        .level
        .clone()
        .unwrap_or_else(|| get_log_level(environment).to_string())
}

fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log a failure with component context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        "❌ ERROR"
    );
}
