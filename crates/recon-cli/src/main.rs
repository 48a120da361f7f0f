// # recon - Domain Reconnaissance CLI
//
// This binary is a THIN integration layer only. All pipeline logic lives in
// recon-core; this file is responsible for:
// 1. Reading configuration (flags, `RECON_*` environment variables, JSON file)
// 2. Initializing logging and the tokio runtime
// 3. Registering providers
// 4. Running one reconnaissance and printing the report as JSON
//
// Logs go to stderr; stdout carries only the JSON report.
//
// ## Configuration
//
// - `RECON_CONFIG`: Path to a JSON config file (see `ReconConfig`)
// - `RECON_OFFLINE`: Use seeded synthetic adapters only (no network)
// - `RECON_SEED`: Seed for the synthetic adapters
// - `RECON_PROVIDER_TIMEOUT`: Per-attempt provider budget in seconds (1-60)
// - `RECON_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// recon example.com --phone "+55 11 99999-9999" --person "Ana Souza"
// RECON_OFFLINE=1 recon example.com --schedule dependency
// ```

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{Parser, ValueEnum};
use recon_core::config::{ProbeConfig, ProviderConfig, Schedule};
use recon_core::{
    Error as ReconError, PersonName, PipelineEvent, ProviderRegistry, ReconConfig, ReconEngine,
    ReconRequest, ReportHandle, RunStatus,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::mpsc;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Run finished (completed or cancelled) and the report was printed
/// - 1: Configuration or input error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum ReconExitCode {
    /// Report printed
    Clean = 0,
    /// Configuration error or invalid input
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ReconExitCode> for ExitCode {
    fn from(code: ReconExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScheduleArg {
    Sequential,
    Dependency,
}

impl From<ScheduleArg> for Schedule {
    fn from(schedule: ScheduleArg) -> Self {
        match schedule {
            ScheduleArg::Sequential => Schedule::Sequential,
            ScheduleArg::Dependency => Schedule::Dependency,
        }
    }
}

/// Staged domain reconnaissance
#[derive(Debug, Parser)]
#[command(name = "recon", version, about)]
struct Args {
    /// Domain to investigate (e.g. example.com)
    domain: String,

    /// Phone number to classify (repeatable, any formatting)
    #[arg(long = "phone", value_name = "NUMBER")]
    phones: Vec<String>,

    /// Person name used for mailbox patterns ("First Last")
    #[arg(long, value_name = "NAME")]
    person: Option<String>,

    /// JSON configuration file
    #[arg(long, env = "RECON_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Use seeded synthetic adapters only
    #[arg(long, env = "RECON_OFFLINE", value_parser = BoolishValueParser::new())]
    offline: bool,

    /// Seed for synthetic adapters
    #[arg(long, env = "RECON_SEED")]
    seed: Option<u64>,

    /// Stage scheduling strategy
    #[arg(long, value_enum)]
    schedule: Option<ScheduleArg>,

    /// Per-attempt provider timeout in seconds
    #[arg(long = "timeout", env = "RECON_PROVIDER_TIMEOUT", value_name = "SECS")]
    provider_timeout_secs: Option<u64>,

    /// Maximum number of active subdomains kept
    #[arg(long)]
    max_subdomains: Option<usize>,

    /// Log verbosity (stderr)
    #[arg(long, env = "RECON_LOG_LEVEL", value_enum, default_value = "info")]
    log_level: LogLevel,
}

impl Args {
    /// Build the effective configuration: file (or defaults), then overrides
    fn to_config(&self) -> Result<ReconConfig> {
        let mut config = match &self.config {
            Some(path) => ReconConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ReconConfig::new(),
        };

        if self.offline || !cfg!(feature = "http") {
            if !self.offline {
                warn!("Built without HTTP providers, running offline");
            }
            let offline = ReconConfig::offline();
            config.geolocation = offline.geolocation;
            config.dns = offline.dns;
            config.subdomain_probe = offline.subdomain_probe;
        }

        if let Some(seed) = self.seed {
            apply_seed(&mut config, seed);
        }
        if let Some(schedule) = self.schedule {
            config.pipeline.schedule = schedule.into();
        }
        if let Some(secs) = self.provider_timeout_secs {
            config.pipeline.provider_timeout_secs = secs;
        }
        if let Some(max) = self.max_subdomains {
            config.pipeline.max_subdomains = max;
        }

        config.validate()?;
        Ok(config)
    }

    fn to_request(&self) -> ReconRequest {
        let mut request = ReconRequest::new(self.domain.clone());
        for phone in &self.phones {
            request = request.with_phone(phone.clone());
        }
        if let Some(person) = self.person.as_deref().and_then(PersonName::parse) {
            request = request.with_person(person);
        }
        request
    }
}

fn apply_seed(config: &mut ReconConfig, value: u64) {
    for entry in config.geolocation.iter_mut().chain(config.dns.iter_mut()) {
        if let ProviderConfig::Synthetic { seed, .. } = entry {
            *seed = Some(value);
        }
    }
    if let ProbeConfig::Synthetic { seed, .. } = &mut config.subdomain_probe {
        *seed = Some(value);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(args.log_level))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ReconExitCode::ConfigError.into();
    }

    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ReconExitCode::ConfigError.into();
        }
    };

    let registry = ProviderRegistry::with_builtins();

    #[cfg(feature = "http")]
    {
        info!("Registering HTTP providers");
        recon_provider_http::register(&registry);
    }

    let engine = match ReconEngine::from_config(&config, &registry) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ReconExitCode::ConfigError.into();
        }
    };

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ReconExitCode::RuntimeError.into();
        }
    };

    let request = args.to_request();
    rt.block_on(async {
        let handle = match engine.start(request) {
            Ok(handle) => handle,
            Err(e @ ReconError::InvalidInput(_)) => {
                eprintln!("Invalid input: {}", e);
                return ReconExitCode::ConfigError;
            }
            Err(e) => {
                error!("Failed to start reconnaissance: {}", e);
                return ReconExitCode::RuntimeError;
            }
        };

        match run(handle).await {
            Ok(()) => ReconExitCode::Clean,
            Err(e) => {
                error!("Reconnaissance failed: {:#}", e);
                ReconExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Drive one run to its end and print the report
async fn run(mut handle: ReportHandle) -> Result<()> {
    let logger = handle.take_events().map(|events| tokio::spawn(drain_events(events)));

    let token = handle.cancellation_token();
    tokio::spawn(async move {
        match wait_for_interrupt().await {
            Ok(signal) => {
                warn!("Received {}, cancelling reconnaissance", signal);
                token.cancel();
            }
            Err(e) => warn!("Interrupt handling unavailable: {}", e),
        }
    });

    let outcome = handle.join().await?;
    // The run dropped its sender, so the logger ends once the queue is empty
    if let Some(logger) = logger {
        logger.await.context("Event logger failed")?;
    }
    if outcome.status == RunStatus::Cancelled {
        warn!(
            "Run cancelled at {}%: {} section(s) left pending",
            outcome.progress,
            outcome.report.pending_sections().len()
        );
    }

    let json = serde_json::to_string_pretty(&outcome.report).context("Failed to encode report")?;
    println!("{}", json);
    Ok(())
}

/// Log events until the run closes the channel, returning how many were seen
async fn drain_events(mut events: mpsc::Receiver<PipelineEvent>) -> usize {
    let mut seen = 0;
    while let Some(event) = events.recv().await {
        log_event(&event);
        seen += 1;
    }
    seen
}

fn log_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::StageFinished {
            stage,
            status,
            progress,
        } => info!("[{:>3}%] {} {}", progress, stage, status.label()),
        PipelineEvent::RunFinished { status, progress } => {
            info!("Run finished: {:?} at {}%", status, progress)
        }
        PipelineEvent::RunStarted { .. } | PipelineEvent::StageStarted { .. } => {}
    }
}

/// Wait for SIGINT or SIGTERM
#[cfg(unix)]
async fn wait_for_interrupt() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_interrupt() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
