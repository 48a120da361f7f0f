//! Contract Test: Observable Progress
//!
//! Constraints verified:
//! - Progress starts at 0, never decreases, and ends at exactly 100
//! - Progress advances only when a stage's fragment has been merged
//! - Events arrive in run order: RunStarted, stage pairs, RunFinished
//!
//! If this test fails, progress is being reported ahead of the report or
//! the event protocol has changed shape.

mod common;

use common::*;
use recon_core::config::{PipelineConfig, Schedule};
use recon_core::report::Liveness;
use recon_core::{PipelineEvent, RunStatus, StageKind};
use std::time::Duration;
use tokio_stream::StreamExt;
use tokio_test::assert_ok;

fn healthy() -> recon_core::Providers {
    providers(
        vec![ScriptedGeo::new("geo", Script::Succeed)],
        vec![ScriptedResolver::new("dns", Script::Succeed)],
        FixedProbe::new(Liveness::Active),
        Duration::from_secs(1),
    )
}

async fn collect_events(schedule: Schedule) -> (Vec<PipelineEvent>, u8) {
    let engine = engine_with(
        healthy(),
        PipelineConfig {
            schedule,
            ..PipelineConfig::default()
        },
    );

    let mut handle = assert_ok!(engine.start("example.com"));
    let mut events = handle.take_events().expect("events available once");
    assert!(handle.take_events().is_none());

    let outcome = assert_ok!(handle.join().await);
    assert_eq!(outcome.status, RunStatus::Completed);

    let mut collected = Vec::new();
    while let Some(event) = events.recv().await {
        collected.push(event);
    }
    (collected, outcome.progress)
}

fn assert_event_protocol(events: &[PipelineEvent]) {
    assert!(matches!(
        events.first(),
        Some(PipelineEvent::RunStarted { stages: 12, .. })
    ));
    assert!(matches!(
        events.last(),
        Some(PipelineEvent::RunFinished {
            status: RunStatus::Completed,
            progress: 100
        })
    ));

    let progress: Vec<u8> = events
        .iter()
        .filter_map(|event| match event {
            PipelineEvent::StageFinished { progress, .. } => Some(*progress),
            _ => None,
        })
        .collect();
    assert_eq!(progress.len(), 12, "one StageFinished per stage");
    assert!(progress.windows(2).all(|w| w[0] < w[1]), "{progress:?}");
    assert_eq!(progress.last(), Some(&100));

    let finished: Vec<StageKind> = events
        .iter()
        .filter_map(|event| match event {
            PipelineEvent::StageFinished { stage, .. } => Some(*stage),
            _ => None,
        })
        .collect();
    let mut sorted = finished.clone();
    sorted.sort();
    assert_eq!(sorted, StageKind::ALL.to_vec(), "each section merged once");
}

#[tokio::test]
async fn sequential_progress_is_strictly_increasing_to_100() {
    let (events, progress) = collect_events(Schedule::Sequential).await;
    assert_eq!(progress, 100);
    assert_event_protocol(&events);

    // Sequential runs start each stage only after the previous one merged
    let order: Vec<StageKind> = events
        .iter()
        .filter_map(|event| match event {
            PipelineEvent::StageStarted { stage } => Some(*stage),
            _ => None,
        })
        .collect();
    assert_eq!(order, StageKind::ALL.to_vec());
}

#[tokio::test]
async fn dependency_schedule_keeps_the_same_progress_contract() {
    let (events, progress) = collect_events(Schedule::Dependency).await;
    assert_eq!(progress, 100);
    assert_event_protocol(&events);

    // Dependents finish after what they read
    let position = |kind: StageKind| {
        events
            .iter()
            .position(|e| matches!(e, PipelineEvent::StageFinished { stage, .. } if *stage == kind))
            .expect("stage finished")
    };
    assert!(position(StageKind::Dns) < position(StageKind::Security));
    assert!(position(StageKind::Geolocation) < position(StageKind::Servers));
    assert!(position(StageKind::Subdomains) < position(StageKind::Certificates));
}

#[tokio::test]
async fn progress_stream_never_goes_backwards() {
    let engine = engine(healthy());
    let handle = assert_ok!(engine.start("example.com"));
    let stream = handle.progress_stream();

    let watcher = tokio::spawn(async move { stream.collect::<Vec<u8>>().await });
    let outcome = assert_ok!(handle.join().await);
    let seen = assert_ok!(watcher.await);

    assert_eq!(outcome.progress, 100);
    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    assert_eq!(seen.last(), Some(&100));
}

#[tokio::test]
async fn handle_reports_final_progress_after_join() {
    let engine = engine(healthy());
    let handle = assert_ok!(engine.start("example.com"));
    let token = handle.cancellation_token();

    let outcome = assert_ok!(handle.join().await);

    assert_eq!(outcome.progress, 100);
    assert!(!token.is_cancelled());
}
