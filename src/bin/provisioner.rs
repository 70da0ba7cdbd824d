//! # Profile Provisioner
//!
//! Runs one provisioning pass: loads configuration, builds the engine, store
//! and event sinks, then drives a single orchestrator run. Ctrl-C while the
//! pool is draining forces shutdown and exits with status 130.
//!
//! With `--events-json` every provisioning event is also written to stdout
//! as a JSON line, ahead of the final report.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info, warn};

use profile_provisioner::automation::{SeedGenerator, SyntheticEngine};
use profile_provisioner::config::loader::ConfigOverrides;
use profile_provisioner::config::{ConfigManager, StoreBackend};
use profile_provisioner::events::{
    write_json_lines, CompositeEventSink, EventPublisher, TracingEventSink,
};
use profile_provisioner::logging::{init_tracing, log_error};
use profile_provisioner::orchestration::{Orchestrator, OrchestratorError};

const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "provisioner")]
#[command(about = "Provision synthetic user profiles with a bounded worker pool")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration directory (default: ./config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Environment whose override file is layered on the base config
    #[arg(short, long)]
    environment: Option<String>,

    /// Override pool.worker_count
    #[arg(short, long)]
    workers: Option<usize>,

    /// Override store.backend
    #[arg(long, value_enum)]
    store: Option<StoreArg>,

    /// Load and validate configuration, print it sanitized, then exit
    #[arg(long)]
    validate_only: bool,

    /// Stream every provisioning event to stdout as one JSON object per line
    #[arg(long)]
    events_json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StoreArg {
    Memory,
    Postgres,
}

impl From<StoreArg> for StoreBackend {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::Memory => StoreBackend::Memory,
            StoreArg::Postgres => StoreBackend::Postgres,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let environment = cli
        .environment
        .clone()
        .unwrap_or_else(ConfigManager::detect_environment);
    let overrides = ConfigOverrides {
        worker_count: cli.workers,
        store_backend: cli.store.map(StoreBackend::from),
    };

    let manager = match ConfigManager::load_with_overrides(
        cli.config_dir.clone(),
        &environment,
        &overrides,
    ) {
        Ok(manager) => manager,
        Err(error) => {
            eprintln!("❌ Configuration error: {error}");
            return Ok(ExitCode::FAILURE);
        }
    };
    let config = manager.config();
    init_tracing(&config.logging, manager.environment());
    config.log_reserved_settings();
    debug!(
        environment = %manager.environment(),
        config = %manager.sanitized(),
        "Configuration loaded successfully"
    );

    if cli.validate_only {
        let sanitized = serde_json::to_string_pretty(&manager.sanitized())
            .context("serializing sanitized configuration")?;
        println!("{sanitized}");
        info!(environment = %manager.environment(), "✅ Configuration is valid");
        return Ok(ExitCode::SUCCESS);
    }

    let store = match profile_provisioner::store::from_config(config).await {
        Ok(store) => store,
        Err(error) => {
            log_error("provisioner", "build_store", &error.to_string(), None);
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut events = CompositeEventSink::new().with_sink(Arc::new(TracingEventSink));
    let event_stream = if cli.events_json {
        let publisher = Arc::new(EventPublisher::default());
        let receiver = publisher.subscribe();
        events = events.with_sink(publisher);
        Some(tokio::spawn(write_json_lines(receiver, std::io::stdout())))
    } else {
        None
    };

    let mut orchestrator = Orchestrator::new(
        config.pool.to_pool_config(),
        Arc::new(SyntheticEngine::new(config.automation.clone())),
        store,
        Arc::new(events),
        SeedGenerator::new(config.automation.email_domain.clone()),
    )
    .context("building orchestrator")?;

    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler available; never interrupt
            futures::future::pending::<()>().await;
        }
    };

    let result = orchestrator.run_until(interrupt).await;

    // The stream ends once the orchestrator, and with it the publisher, is gone
    drop(orchestrator);
    if let Some(stream) = event_stream {
        let written = stream
            .await
            .context("event stream task")?
            .context("writing events to stdout")?;
        debug!(written, "Event stream closed");
    }

    match result {
        Ok(report) => {
            println!("{report}");
            if report.forced {
                warn!(%report, "Run finished by forced shutdown");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(OrchestratorError::Interrupted { report }) => {
            println!("{report}");
            warn!(%report, "Run interrupted");
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
        Err(error) => {
            log_error("provisioner", "run", &error.to_string(), None);
            Ok(ExitCode::FAILURE)
        }
    }
}
