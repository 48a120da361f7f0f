//! Contract Test: Configuration and Plugin Wiring
//!
//! Constraints verified:
//! - A JSON file with only some sections loads, the rest take defaults
//! - Invalid settings are rejected at load time, not mid-run
//! - Adapter types are resolved through the registry; unknown types fail early
//!
//! If this test fails, configuration errors have started surfacing during a
//! run, or adapters are being constructed outside the registry.

use recon_core::config::{PipelineConfig, ProbeConfig, ProviderConfig, Schedule};
use recon_core::{Error, ProviderRegistry, ReconConfig, ReconEngine, StageKind};
use std::io::Write;
use tempfile::NamedTempFile;
use tokio_test::{assert_err, assert_ok};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn partial_file_takes_defaults_for_missing_sections() {
    let file = write_config(
        r#"{
            "geolocation": [{ "type": "synthetic", "name": "lab-geo", "seed": 3 }],
            "pipeline": { "schedule": "dependency", "provider_timeout_secs": 5 }
        }"#,
    );

    let config = assert_ok!(ReconConfig::from_json_file(file.path()));

    assert_eq!(
        config.geolocation,
        vec![ProviderConfig::Synthetic {
            name: Some("lab-geo".to_string()),
            seed: Some(3)
        }]
    );
    assert_eq!(config.dns, ReconConfig::new().dns);
    assert_eq!(config.subdomain_probe, ProbeConfig::default());
    assert_eq!(config.pipeline.schedule, Schedule::Dependency);
    assert_eq!(config.pipeline.provider_timeout_secs, 5);
    assert_eq!(config.pipeline.max_subdomains, PipelineConfig::default().max_subdomains);
}

#[test]
fn out_of_range_settings_are_rejected_on_load() {
    for contents in [
        r#"{ "pipeline": { "provider_timeout_secs": 0 } }"#,
        r#"{ "pipeline": { "provider_timeout_secs": 61 } }"#,
        r#"{ "pipeline": { "max_subdomains": 0 } }"#,
        r#"{ "subdomain_probe": { "type": "synthetic", "active_ratio": 1.5 } }"#,
        r#"{ "dns": [{ "type": "doh", "endpoint": "dns.google/resolve" }] }"#,
    ] {
        let file = write_config(contents);
        let err = assert_err!(ReconConfig::from_json_file(file.path()));
        assert!(matches!(err, Error::Config(_)), "{contents}: {err}");
    }
}

#[test]
fn malformed_and_missing_files_are_distinct_errors() {
    let file = write_config("{ not json");
    let err = assert_err!(ReconConfig::from_json_file(file.path()));
    assert!(matches!(err, Error::Config(_)));

    let dir = tempfile::tempdir().expect("temp dir");
    let err = assert_err!(ReconConfig::from_json_file(dir.path().join("absent.json")));
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn unknown_adapter_type_fails_engine_construction() {
    let registry = ProviderRegistry::with_builtins();

    let mut config = ReconConfig::offline();
    config.geolocation.push(ProviderConfig::Custom {
        factory: "carrier-pigeon".to_string(),
        config: serde_json::json!({ "coop": "north" }),
    });
    let Err(err) = ReconEngine::from_config(&config, &registry) else {
        panic!("unknown adapter type must be rejected");
    };
    assert!(err.to_string().contains("Unknown geolocation provider type: carrier-pigeon"));

    // The default config names HTTP adapters that this registry lacks
    let Err(err) = ReconEngine::from_config(&ReconConfig::new(), &registry) else {
        panic!("HTTP adapter types are not registered here");
    };
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn resolver_probe_config_builds_a_complete_engine() {
    let registry = ProviderRegistry::with_builtins();
    let mut config = ReconConfig::offline();
    config.subdomain_probe = ProbeConfig::Dns;

    let engine = assert_ok!(ReconEngine::from_config(&config, &registry));
    assert_eq!(engine.stage_kinds(), StageKind::ALL.to_vec());
}

#[tokio::test]
async fn resolver_probe_marks_resolving_hosts_active() {
    let registry = ProviderRegistry::with_builtins();
    let mut config = ReconConfig::offline();
    config.subdomain_probe = ProbeConfig::Dns;
    config.pipeline.max_subdomains = 3;

    let engine = assert_ok!(ReconEngine::from_config(&config, &registry));
    let outcome = assert_ok!(
        engine
            .run("example.com", tokio_util::sync::CancellationToken::new())
            .await
    );

    // The synthetic resolver answers every name, so the cap applies
    let subdomains = &outcome.report.subdomains;
    assert_eq!(subdomains.data.len(), 3);
    assert_eq!(subdomains.status.label(), "sourced");
}
