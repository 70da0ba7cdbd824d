//! # Provisioner Configuration
//!
//! Configuration is read once at process start into an explicit
//! [`ProvisionerConfig`] value and passed by reference to whoever needs it.
//! There is no global configuration singleton.
//!
//! ## Sources (later sources override earlier ones)
//!
//! 1. `<config_dir>/provisioner.toml`
//! 2. `<config_dir>/environments/<environment>.toml` (optional)
//! 3. `PROVISIONER__<SECTION>__<KEY>` environment variables
//!
//! ## Usage
//!
//! ```rust,no_run
//! use profile_provisioner::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let pool = manager.config().pool.to_pool_config();
//! println!("workers: {}", pool.worker_count);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::constants::pool::MAX_TIMEOUT_SECONDS;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring `config/provisioner.toml`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvisionerConfig {
    /// Worker pool sizing and timeouts
    pub pool: PoolSettings,

    /// Settings handed to the automation engine
    #[serde(default)]
    pub automation: AutomationConfig,

    /// Database connection settings for the Postgres store
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Which profile store backs the run
    #[serde(default)]
    pub store: StoreConfig,

    /// Log level and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Pool settings as written in configuration files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolSettings {
    pub worker_count: usize,
    pub per_task_timeout_seconds: u64,
    pub shutdown_timeout_seconds: u64,
    /// Reserved: parsed and validated, never interpreted as a retry loop
    #[serde(default)]
    pub max_retries: u32,
}

impl PoolSettings {
    pub fn to_pool_config(&self) -> PoolConfig {
        PoolConfig {
            worker_count: self.worker_count,
            per_task_timeout: Duration::from_secs(self.per_task_timeout_seconds),
            shutdown_timeout: Duration::from_secs(self.shutdown_timeout_seconds),
        }
    }
}

/// Immutable pool parameters read once at orchestrator construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub worker_count: usize,
    pub per_task_timeout: Duration,
    pub shutdown_timeout: Duration,
}

impl PoolConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.worker_count == 0 {
            return Err(ConfigurationError::invalid_value(
                "pool.worker_count",
                "0",
                "must be at least 1",
            ));
        }
        if self.per_task_timeout.is_zero() {
            return Err(ConfigurationError::invalid_value(
                "pool.per_task_timeout_seconds",
                "0",
                "must be greater than 0",
            ));
        }
        if self.shutdown_timeout.is_zero() {
            return Err(ConfigurationError::invalid_value(
                "pool.shutdown_timeout_seconds",
                "0",
                "must be greater than 0",
            ));
        }
        check_timeout_bound("pool.per_task_timeout_seconds", self.per_task_timeout)?;
        check_timeout_bound("pool.shutdown_timeout_seconds", self.shutdown_timeout)?;
        Ok(())
    }
}

fn check_timeout_bound(field: &str, timeout: Duration) -> ConfigResult<()> {
    if timeout.as_secs() > MAX_TIMEOUT_SECONDS {
        return Err(ConfigurationError::invalid_value(
            field,
            timeout.as_secs().to_string(),
            format!("must be at most {MAX_TIMEOUT_SECONDS}"),
        ));
    }
    Ok(())
}

/// Engine settings. The core passes these through without interpreting them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AutomationConfig {
    pub headless: bool,
    pub email_domain: String,
    pub profile_base_url: String,
    pub media_base_url: String,
    pub simulated_latency_ms: u64,
    /// Whether the engine returns a password or leaves generation to the task
    pub supply_password: bool,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            headless: true,
            email_domain: "example.com".to_string(),
            profile_base_url: "https://profiles.example.com".to_string(),
            media_base_url: "https://media.example.com".to_string(),
            simulated_latency_ms: 0,
            supply_password: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/profile_provisioner_development".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 10,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Overrides the environment-derived level when set
    pub level: Option<String>,
    pub format: LogFormat,
}

impl ProvisionerConfig {
    /// Check every startup invariant. Any error here aborts the process before
    /// a single task runs.
    pub fn validate(&self) -> ConfigResult<()> {
        self.pool.to_pool_config().validate()?;

        if self.automation.email_domain.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "email_domain",
                "automation",
            ));
        }

        if self.store.backend == StoreBackend::Postgres {
            if self.database.url.trim().is_empty() {
                return Err(ConfigurationError::missing_required_field(
                    "url", "database",
                ));
            }
            if self.database.max_connections == 0 {
                return Err(ConfigurationError::invalid_value(
                    "database.max_connections",
                    "0",
                    "must be at least 1",
                ));
            }
        }

        Ok(())
    }

    /// Warn about settings that are accepted but never acted on.
    ///
    /// Validation runs before logging is configured, so callers invoke this
    /// once their subscriber is installed.
    pub fn log_reserved_settings(&self) {
        if self.pool.max_retries > 0 {
            warn!(
                max_retries = self.pool.max_retries,
                "pool.max_retries is reserved and has no effect; tasks are never retried"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn config() -> ProvisionerConfig {
        ProvisionerConfig {
            pool: PoolSettings {
                worker_count: 3,
                per_task_timeout_seconds: 30,
                shutdown_timeout_seconds: 60,
                max_retries: 0,
            },
            automation: AutomationConfig::default(),
            database: DatabaseConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = config();
        config.pool.worker_count = 0;
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("pool.worker_count"));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut per_task = config();
        per_task.pool.per_task_timeout_seconds = 0;
        assert!(per_task.validate().is_err());

        let mut shutdown = config();
        shutdown.pool.shutdown_timeout_seconds = 0;
        assert!(shutdown.validate().is_err());
    }

    #[test]
    fn test_reserved_retries_accepted() {
        let mut config = config();
        config.pool.max_retries = 3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeouts_above_bound_rejected() {
        let mut shutdown = config();
        shutdown.pool.shutdown_timeout_seconds = i64::MAX as u64;
        let error = shutdown.validate().unwrap_err();
        assert!(matches!(error, ConfigurationError::InvalidValue { .. }));
        assert!(error.to_string().contains("pool.shutdown_timeout_seconds"));

        let mut per_task = config();
        per_task.pool.per_task_timeout_seconds = MAX_TIMEOUT_SECONDS + 1;
        let error = per_task.validate().unwrap_err();
        assert!(error.to_string().contains("pool.per_task_timeout_seconds"));

        let mut at_bound = config();
        at_bound.pool.per_task_timeout_seconds = MAX_TIMEOUT_SECONDS;
        at_bound.pool.shutdown_timeout_seconds = MAX_TIMEOUT_SECONDS;
        assert!(at_bound.validate().is_ok());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(config: &ProvisionerConfig) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || config.log_reserved_settings());
        logs.contents()
    }

    #[test]
    fn test_reserved_retries_logged_as_warning() {
        let mut config = config();
        config.pool.max_retries = 3;
        let output = capture(&config);
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("pool.max_retries is reserved"), "{output}");
        assert!(output.contains("max_retries=3"), "{output}");
    }

    #[test]
    fn test_no_warning_without_retries() {
        assert!(capture(&config()).is_empty());
    }

    #[test]
    fn test_database_url_only_required_for_postgres() {
        let mut config = config();
        config.database.url = String::new();
        assert!(config.validate().is_err());

        config.store.backend = StoreBackend::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pool_config_durations() {
        let pool = config().pool.to_pool_config();
        assert_eq!(pool.worker_count, 3);
        assert_eq!(pool.per_task_timeout, Duration::from_secs(30));
        assert_eq!(pool.shutdown_timeout, Duration::from_secs(60));
    }
}
