//! Reconnaissance engine
//!
//! The ReconEngine is responsible for:
//! - Validating the requested domain
//! - Running the stage list under the configured schedule
//! - Merging each stage's fragment into the run's report
//! - Publishing progress and pipeline events
//! - Honouring the run's cancellation token
//!
//! ## Architecture
//!
//! ```text
//!                    ┌──────────────┐
//!  ReconRequest ────▶│ ReconEngine  │──── progress (watch) ────▶ caller
//!                    └──────────────┘──── PipelineEvent (mpsc) ─▶ caller
//!                           │
//!           ┌───────────────┼──────────────────┐
//!           ▼               ▼                  ▼
//!   ┌──────────────┐ ┌──────────────┐  ┌──────────────┐
//!   │   Stage 1    │ │   Stage 2    │  │   Stage N    │
//!   └──────────────┘ └──────────────┘  └──────────────┘
//!           │               │                  │
//!           └─── Fragment ──┴──── Fragment ────┘
//!                           ▼
//!                    ┌──────────────┐
//!                    │    Report    │  (single writer: the engine)
//!                    └──────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Domain validated (an invalid domain fails before any stage starts)
//! 2. For each stage: emit `StageStarted`, execute behind the stage boundary
//! 3. Merge the fragment, advance progress to `merged * 100 / stage_count`
//! 4. Emit `StageFinished`; after the last stage emit `RunFinished`
//!
//! A run either completes (every section set, possibly degraded) or is
//! cancelled (sections whose stage had not been merged stay `Pending`).

use crate::chain::FallbackChain;
use crate::config::{PipelineConfig, ProbeConfig, ReconConfig, Schedule};
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::registry::ProviderRegistry;
use crate::report::{Fragment, Report, SectionStatus, StageKind};
use crate::request::ReconRequest;
use crate::stages::{self, Providers, ResolverProbe, Stage, StageContext, StageOutput};
use crate::synthetic::SyntheticProbe;
use crate::traits::SubdomainProbe;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::{self, JoinError, JoinHandle, JoinSet};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Degradation reason for sections left out of a custom stage list
pub const UNSCHEDULED_REASON: &str = "no stage scheduled for this section";

/// Terminal state of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every stage was merged
    Completed,
    /// The caller withdrew interest before the last stage was merged
    Cancelled,
}

/// Result of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// Progress recorded when the run ended
    pub progress: u8,
    pub report: Report,
}

/// Events emitted by the ReconEngine
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Run started
    RunStarted { domain: Domain, stages: usize },

    /// A stage began executing
    StageStarted { stage: StageKind },

    /// A stage's fragment was merged
    StageFinished {
        stage: StageKind,
        status: SectionStatus,
        progress: u8,
    },

    /// Run ended
    RunFinished { status: RunStatus, progress: u8 },
}

/// Handle to a run started with [`ReconEngine::start`]
pub struct ReportHandle {
    progress: watch::Receiver<u8>,
    events: Option<mpsc::Receiver<PipelineEvent>>,
    token: CancellationToken,
    task: JoinHandle<RunOutcome>,
}

impl ReportHandle {
    /// Latest progress value (0-100)
    pub fn progress(&self) -> u8 {
        *self.progress.borrow()
    }

    /// Progress updates; yields the current value first and ends with the run
    pub fn progress_stream(&self) -> WatchStream<u8> {
        WatchStream::new(self.progress.clone())
    }

    /// Take the event receiver (only available once)
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<PipelineEvent>> {
        self.events.take()
    }

    /// Withdraw interest in the run
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The token bound to this run
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait for the final report
    pub async fn join(self) -> Result<RunOutcome> {
        self.task
            .await
            .map_err(|e| Error::Other(format!("Pipeline task failed: {}", e)))
    }
}

/// Core reconnaissance engine
///
/// The engine is cheap to clone and holds no per-run state: every run owns
/// its report, progress counter and event channel, so concurrent runs never
/// share mutable state.
#[derive(Clone)]
pub struct ReconEngine {
    providers: Arc<Providers>,
    stages: Vec<Arc<dyn Stage>>,
    pipeline: PipelineConfig,
}

impl ReconEngine {
    /// Create an engine running the default stage list
    pub fn new(providers: Providers, pipeline: PipelineConfig) -> Result<Self> {
        pipeline.validate()?;
        Ok(Self {
            providers: Arc::new(providers),
            stages: stages::default_stages(),
            pipeline,
        })
    }

    /// Build the fallback chains described by `config`
    ///
    /// Adapters are created through `registry` in configured order.
    pub fn from_config(config: &ReconConfig, registry: &ProviderRegistry) -> Result<Self> {
        config.validate()?;
        let timeout = config.pipeline.provider_timeout();

        let mut geolocation = FallbackChain::new("geolocation", timeout);
        for entry in &config.geolocation {
            geolocation.push(Arc::from(registry.create_geo_provider(entry)?));
        }

        let mut dns = FallbackChain::new("dns", timeout);
        for entry in &config.dns {
            dns.push(Arc::from(registry.create_dns_resolver(entry)?));
        }

        let probe: Arc<dyn SubdomainProbe> = match &config.subdomain_probe {
            ProbeConfig::Synthetic { seed, active_ratio } => {
                Arc::new(SyntheticProbe::new(seed.unwrap_or_default(), *active_ratio))
            }
            ProbeConfig::Dns => Arc::new(ResolverProbe::new(dns.clone())),
        };

        info!(
            "Geolocation chain: {:?}, DNS chain: {:?}",
            geolocation.provider_names(),
            dns.provider_names()
        );

        Self::new(Providers::new(geolocation, dns, probe), config.pipeline.clone())
    }

    /// Replace the stage list
    pub fn with_stages(mut self, stages: Vec<Arc<dyn Stage>>) -> Self {
        self.stages = stages;
        self
    }

    /// Sections filled by this engine, in stage order
    pub fn stage_kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|s| s.kind()).collect()
    }

    /// Start a run in the background
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the domain is malformed; no stage is started.
    pub fn start(&self, request: impl Into<ReconRequest>) -> Result<ReportHandle> {
        let (request, domain) = Self::prepare(request.into())?;

        let (progress_tx, progress_rx) = watch::channel(0u8);
        let (event_tx, event_rx) = mpsc::channel(self.pipeline.event_channel_capacity);
        let token = CancellationToken::new();

        let engine = self.clone();
        let run_token = token.clone();
        let task = tokio::spawn(async move {
            engine
                .execute_run(request, domain, progress_tx, Some(event_tx), run_token)
                .await
        });

        Ok(ReportHandle {
            progress: progress_rx,
            events: Some(event_rx),
            token,
            task,
        })
    }

    /// Run to completion (or cancellation) on the current task
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the domain is malformed; no stage is started.
    pub async fn run(
        &self,
        request: impl Into<ReconRequest>,
        token: CancellationToken,
    ) -> Result<RunOutcome> {
        let (request, domain) = Self::prepare(request.into())?;
        let (progress_tx, _) = watch::channel(0u8);
        Ok(self
            .execute_run(request, domain, progress_tx, None, token)
            .await)
    }

    fn prepare(request: ReconRequest) -> Result<(ReconRequest, Domain)> {
        let domain = Domain::parse(&request.domain)?;
        Ok((request, domain))
    }

    async fn execute_run(
        &self,
        request: ReconRequest,
        domain: Domain,
        progress: watch::Sender<u8>,
        events: Option<mpsc::Sender<PipelineEvent>>,
        token: CancellationToken,
    ) -> RunOutcome {
        info!(
            "Starting reconnaissance of {} ({} stages, {:?} schedule)",
            domain,
            self.stages.len(),
            self.pipeline.schedule
        );

        let mut run = Run {
            ctx: StageContext {
                domain: domain.clone(),
                request: Arc::new(request),
                report: Arc::new(Report::new(domain.clone())),
                providers: Arc::clone(&self.providers),
                max_subdomains: self.pipeline.max_subdomains,
            },
            merged: 0,
            total: self.stages.len(),
            progress,
            events,
        };

        run.emit(PipelineEvent::RunStarted {
            domain,
            stages: run.total,
        });

        let status = match self.pipeline.schedule {
            Schedule::Sequential => self.run_sequential(&mut run, &token).await,
            Schedule::Dependency => self.run_waves(&mut run, &token).await,
        };

        run.finish(status)
    }

    async fn run_sequential(&self, run: &mut Run, token: &CancellationToken) -> RunStatus {
        for stage in &self.stages {
            if token.is_cancelled() {
                return RunStatus::Cancelled;
            }

            let kind = stage.kind();
            run.emit(PipelineEvent::StageStarted { stage: kind });

            // Spawned so a panicking stage degrades instead of unwinding the run
            let mut task = {
                let ctx = run.snapshot();
                let stage = Arc::clone(stage);
                tokio::spawn(async move { stages::execute(stage.as_ref(), &ctx).await })
            };

            let output = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    task.abort();
                    return RunStatus::Cancelled;
                }
                joined = &mut task => joined.unwrap_or_else(|e| task_failed(kind, &e)),
            };

            run.merge(kind, output);
        }

        RunStatus::Completed
    }

    /// Run stages in waves whose dependencies are already merged
    ///
    /// Stages within a wave run concurrently; their fragments are merged in
    /// stage-list order once the whole wave is done. A dependency on a
    /// section no stage fills is treated as satisfied.
    async fn run_waves(&self, run: &mut Run, token: &CancellationToken) -> RunStatus {
        let scheduled: HashSet<StageKind> = self.stages.iter().map(|s| s.kind()).collect();
        let mut merged: HashSet<StageKind> = HashSet::new();
        let mut pending: Vec<Arc<dyn Stage>> = self.stages.clone();

        while !pending.is_empty() {
            if token.is_cancelled() {
                return RunStatus::Cancelled;
            }

            let (mut ready, mut blocked): (Vec<_>, Vec<_>) =
                pending.into_iter().partition(|stage| {
                    stage
                        .dependencies()
                        .iter()
                        .all(|dep| merged.contains(dep) || !scheduled.contains(dep))
                });

            if ready.is_empty() {
                warn!(
                    "Dependency cycle among {:?}, running {} next",
                    blocked.iter().map(|s| s.kind()).collect::<Vec<_>>(),
                    blocked[0].kind()
                );
                ready.push(blocked.remove(0));
            }
            pending = blocked;

            debug!(
                "Starting wave: {:?}",
                ready.iter().map(|s| s.kind()).collect::<Vec<_>>()
            );

            let mut tasks = JoinSet::new();
            let mut slots: HashMap<task::Id, usize> = HashMap::new();
            {
                let ctx = run.snapshot();
                for (index, stage) in ready.iter().enumerate() {
                    run.emit(PipelineEvent::StageStarted { stage: stage.kind() });
                    let stage = Arc::clone(stage);
                    let ctx = ctx.clone();
                    let id = tasks
                        .spawn(async move { stages::execute(stage.as_ref(), &ctx).await })
                        .id();
                    slots.insert(id, index);
                }
            }

            let mut outputs: Vec<Option<StageOutput>> = vec![None; ready.len()];
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        tasks.abort_all();
                        return RunStatus::Cancelled;
                    }
                    joined = tasks.join_next_with_id() => match joined {
                        Some(Ok((id, output))) => {
                            if let Some(&index) = slots.get(&id) {
                                outputs[index] = Some(output);
                            }
                        }
                        Some(Err(e)) => {
                            if let Some(&index) = slots.get(&e.id()) {
                                outputs[index] = Some(task_failed(ready[index].kind(), &e));
                            }
                        }
                        None => break,
                    },
                }
            }

            for (stage, output) in ready.iter().zip(outputs) {
                let kind = stage.kind();
                let output = output.unwrap_or_else(|| {
                    StageOutput::degraded(kind, "stage task did not complete")
                });
                run.merge(kind, output);
                merged.insert(kind);
            }
        }

        RunStatus::Completed
    }
}

/// State owned by one run
///
/// `ctx.report` is the accumulating report; stages only ever see clones of
/// the `Arc`, which are dropped before the next merge.
struct Run {
    ctx: StageContext,
    merged: usize,
    total: usize,
    progress: watch::Sender<u8>,
    events: Option<mpsc::Sender<PipelineEvent>>,
}

impl Run {
    /// Context holding the report as merged so far
    fn snapshot(&self) -> StageContext {
        self.ctx.clone()
    }

    fn merge(&mut self, kind: StageKind, output: StageOutput) {
        let status = output.status.clone();
        Arc::make_mut(&mut self.ctx.report).apply(output.fragment, output.status);
        self.merged += 1;

        let progress = progress_for(self.merged, self.total);
        self.progress.send_replace(progress);

        debug!("{}: merged ({}), progress {}%", kind, status.label(), progress);
        self.emit(PipelineEvent::StageFinished {
            stage: kind,
            status,
            progress,
        });
    }

    fn finish(mut self, status: RunStatus) -> RunOutcome {
        if status == RunStatus::Completed {
            self.settle_unscheduled();
        }

        let progress = *self.progress.borrow();
        match status {
            RunStatus::Completed => info!("Reconnaissance of {} completed", self.ctx.domain),
            RunStatus::Cancelled => info!(
                "Reconnaissance of {} cancelled at {}%",
                self.ctx.domain, progress
            ),
        }
        self.emit(PipelineEvent::RunFinished { status, progress });

        RunOutcome {
            status,
            progress,
            report: Arc::unwrap_or_clone(self.ctx.report),
        }
    }

    /// Give sections no scheduled stage fills their default data
    ///
    /// Only a cancelled run may hand back `Pending` sections.
    fn settle_unscheduled(&mut self) {
        let unscheduled = self.ctx.report.pending_sections();
        if unscheduled.is_empty() {
            return;
        }

        debug!("No stage scheduled for {:?}", unscheduled);
        let report = Arc::make_mut(&mut self.ctx.report);
        for kind in unscheduled {
            report.apply(
                Fragment::empty(kind),
                SectionStatus::Degraded {
                    reason: UNSCHEDULED_REASON.to_string(),
                },
            );
        }
    }

    /// Emit a pipeline event
    fn emit(&self, event: PipelineEvent) {
        let Some(events) = &self.events else {
            return;
        };
        // Send event, logging warning if channel is full (backpressure)
        match events.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    "Event channel full, dropping event; consider raising event_channel_capacity"
                );
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Event receiver dropped, event discarded");
            }
        }
    }
}

/// Degraded output for a stage whose task panicked or was aborted
fn task_failed(kind: StageKind, error: &JoinError) -> StageOutput {
    warn!("{}: stage task failed: {}", kind, error);
    StageOutput::degraded(kind, format!("stage task failed: {}", error))
}

/// Progress after `merged` of `total` stages
fn progress_for(merged: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    // merged <= total, so the result is <= 100
    u8::try_from(merged.min(total) * 100 / total).unwrap_or(100)
}
