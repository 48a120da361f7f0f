//! Contract Test: Stage Failure Boundary
//!
//! Constraints verified:
//! - A stage that errors yields its section's default data, tagged degraded
//! - A stage cannot write a section other than its own
//! - Stages after a degraded one still run and see the merged report
//! - A panicking stage is degraded, under either schedule
//! - Sections no stage fills are degraded, never pending, once a run completes
//!
//! If this test fails, a stage failure is able to abort the run or corrupt
//! a neighbouring section.

mod common;

use async_trait::async_trait;
use common::*;
use recon_core::report::{Fragment, Liveness, Whois};
use recon_core::engine::UNSCHEDULED_REASON;
use recon_core::stages::{DnsStage, GeolocationStage, SecurityStage, WhoisStage};
use recon_core::{
    Error, PipelineConfig, Result, RunStatus, Schedule, SectionStatus, Stage, StageContext,
    StageKind, StageOutput,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_ok;
use tokio_util::sync::CancellationToken;

struct ExplodingDns;

#[async_trait]
impl Stage for ExplodingDns {
    fn kind(&self) -> StageKind {
        StageKind::Dns
    }

    async fn run(&self, _ctx: &StageContext) -> Result<StageOutput> {
        Err(Error::stage("dns", "resolver library panicked politely"))
    }
}

/// Claims to be the history stage but returns a WHOIS fragment
struct Trespasser;

#[async_trait]
impl Stage for Trespasser {
    fn kind(&self) -> StageKind {
        StageKind::History
    }

    async fn run(&self, _ctx: &StageContext) -> Result<StageOutput> {
        Ok(StageOutput::derived(Fragment::Whois(Whois {
            registrar: "Overwritten".to_string(),
            ..Whois::default()
        })))
    }
}

/// Indexes past the end of an empty list
struct PanickingWhois;

#[async_trait]
impl Stage for PanickingWhois {
    fn kind(&self) -> StageKind {
        StageKind::Whois
    }

    async fn run(&self, _ctx: &StageContext) -> Result<StageOutput> {
        let nameservers: Vec<String> = Vec::new();
        let first = nameservers[3].clone();
        Ok(StageOutput::placeholder(Fragment::Whois(Whois {
            registrar: first,
            ..Whois::default()
        })))
    }
}

fn engine_for(stages: Vec<Arc<dyn Stage>>) -> recon_core::ReconEngine {
    engine(providers(
        vec![ScriptedGeo::new("geo", Script::Succeed)],
        vec![ScriptedResolver::new("dns", Script::Succeed)],
        FixedProbe::new(Liveness::Active),
        Duration::from_secs(1),
    ))
    .with_stages(stages)
}

#[tokio::test]
async fn failing_stage_is_degraded_and_the_run_continues() {
    let engine = engine_for(vec![Arc::new(ExplodingDns), Arc::new(SecurityStage)]);
    assert_eq!(engine.stage_kinds(), [StageKind::Dns, StageKind::Security]);

    let outcome = assert_ok!(engine.run("example.com", CancellationToken::new()).await);

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.progress, 100);
    match &outcome.report.dns.status {
        SectionStatus::Degraded { reason } => assert!(reason.contains("panicked politely")),
        other => panic!("expected degraded dns, got {other:?}"),
    }
    assert!(outcome.report.dns.data.a.is_empty());

    // Security ran on the degraded (empty) DNS data
    assert_eq!(outcome.report.security.status, SectionStatus::Derived);
    assert!(!outcome.report.security.data.mx_present);
}

#[tokio::test]
async fn stage_cannot_write_another_section() {
    let engine = engine_for(vec![Arc::new(DnsStage), Arc::new(WhoisStage), Arc::new(Trespasser)]);

    let outcome = assert_ok!(engine.run("example.com", CancellationToken::new()).await);

    // WHOIS keeps what its own stage produced
    assert_eq!(outcome.report.whois.status, SectionStatus::Placeholder);
    assert_ne!(outcome.report.whois.data.registrar, "Overwritten");
    assert_eq!(
        outcome.report.whois.data.nameservers,
        ["ns1.example.com", "ns2.example.net"]
    );

    assert_eq!(outcome.report.history.status.label(), "degraded");
    assert!(outcome.report.history.data.snapshots.is_empty());
}

#[tokio::test]
async fn sections_without_a_stage_are_degraded_on_completion() {
    let engine = engine_for(vec![Arc::new(DnsStage)]);

    let outcome = assert_ok!(engine.run("example.com", CancellationToken::new()).await);

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.progress, 100);
    assert!(outcome.report.pending_sections().is_empty());
    assert_eq!(outcome.report.status(StageKind::Dns).label(), "sourced");
    assert_eq!(
        outcome.report.geolocation.status,
        SectionStatus::Degraded {
            reason: UNSCHEDULED_REASON.to_string()
        }
    );
    assert!(outcome.report.geolocation.data.is_fallback());
}

#[tokio::test]
async fn panicking_stage_is_degraded_under_both_schedules() {
    for schedule in [Schedule::Sequential, Schedule::Dependency] {
        let pipeline = PipelineConfig {
            schedule,
            ..PipelineConfig::default()
        };
        let engine = engine_with(
            providers(
                vec![ScriptedGeo::new("geo", Script::Succeed)],
                vec![ScriptedResolver::new("dns", Script::Succeed)],
                FixedProbe::new(Liveness::Active),
                Duration::from_secs(1),
            ),
            pipeline,
        )
        .with_stages(vec![
            Arc::new(GeolocationStage),
            Arc::new(DnsStage),
            Arc::new(PanickingWhois),
        ]);

        let handle = assert_ok!(engine.start("example.com"));
        let outcome = assert_ok!(handle.join().await);

        assert_eq!(outcome.status, RunStatus::Completed, "{schedule:?}");
        assert_eq!(outcome.progress, 100);
        match &outcome.report.whois.status {
            SectionStatus::Degraded { reason } => {
                assert!(reason.contains("panicked"), "{schedule:?}: {reason}")
            }
            other => panic!("{schedule:?}: expected degraded whois, got {other:?}"),
        }
        assert_eq!(outcome.report.whois.data, Whois::default());
        assert_eq!(outcome.report.dns.status.label(), "sourced");
        assert_eq!(outcome.report.geolocation.status.label(), "sourced");
    }
}
