//! # System Constants
//!
//! Event names, outcome labels and credential-generation parameters shared by
//! the orchestrator, the provisioning task and the event sinks.

/// Observation events emitted once per state transition
pub mod events {
    // Run lifecycle events
    pub const RUN_STARTED: &str = "run-started";
    pub const RUN_TERMINATED: &str = "run-terminated";
    pub const RUN_FORCED_SHUTDOWN: &str = "run-forced-shutdown";
    pub const RUN_INTERRUPTED: &str = "run-interrupted";

    // Task terminal events
    pub const TASK_SUCCEEDED: &str = "task-succeeded";
    pub const TASK_AUTOMATION_FAILED: &str = "task-automation-failed";
    pub const TASK_STORE_FAILED: &str = "task-store-failed";
}

/// Reasons recorded in `TaskOutcome::AutomationFailed` by the orchestrator itself
pub mod reasons {
    /// Task was still running when the pool was force-cancelled
    pub const FORCED_SHUTDOWN: &str = "forced-shutdown";
    /// Prefix for tasks whose worker panicked
    pub const TASK_PANICKED: &str = "task panicked";
}

/// Password alphabet and generation parameters
pub mod credentials {
    pub const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    pub const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    pub const DIGITS: &[u8] = b"0123456789";
    pub const SYMBOLS: &[u8] = b"!@#$%^&*";

    /// Symbols accepted by `is_valid_password`; wider than the generated set
    pub const ACCEPTED_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

    /// Length of passwords produced by `generate_secure_password`
    pub const GENERATED_PASSWORD_LENGTH: usize = 12;
    /// Minimum length accepted by `is_valid_password`
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Raw salt size before text encoding
    pub const SALT_BYTES: usize = 16;
}

/// Pool sizing limits enforced by `PoolConfig::validate`
pub mod pool {
    /// Upper bound for either timeout: 30 days
    pub const MAX_TIMEOUT_SECONDS: u64 = 30 * 24 * 60 * 60;
}

/// Values written alongside each persisted profile
pub mod store {
    pub const PLATFORM_LABEL: &str = "synthetic";
    /// `status_id` for a freshly created profile
    pub const STATUS_CREATED: i32 = 1;
}

/// Environment variables consulted at startup
pub mod env {
    pub const ENVIRONMENT: &str = "PROVISIONER_ENV";
    pub const ENVIRONMENT_FALLBACK: &str = "APP_ENV";
    pub const CONFIG_PREFIX: &str = "PROVISIONER";
    pub const CONFIG_SEPARATOR: &str = "__";
    pub const DEFAULT_ENVIRONMENT: &str = "development";
}
