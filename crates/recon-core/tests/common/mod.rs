//! Test doubles and common utilities for pipeline contract tests
//!
//! These doubles script adapter behaviour (fail, answer, hang) and count how
//! often the pipeline calls them, without touching the network.

#![allow(dead_code)]

use recon_core::config::PipelineConfig;
use recon_core::error::{Error, Result};
use recon_core::report::{Geolocation, Liveness};
use recon_core::traits::{DnsRecordType, DnsResolver, GeoProvider, ProviderAdapter, SubdomainProbe};
use recon_core::{FallbackChain, Providers, ReconEngine};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted adapter does when called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Return a provider error
    Fail,
    /// Return canned data
    Succeed,
    /// Never return
    Hang,
}

async fn hang() {
    tokio::time::sleep(Duration::from_secs(3600)).await;
}

/// A geolocation provider with scripted behaviour
pub struct ScriptedGeo {
    name: &'static str,
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedGeo {
    pub fn new(name: &'static str, script: Script) -> Arc<Self> {
        Arc::new(Self {
            name,
            script,
            calls: AtomicUsize::new(0),
        })
    }

    /// Number of times locate() was called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The record returned by a succeeding provider
    pub fn answer(host: &str) -> Geolocation {
        Geolocation {
            ip: "192.0.2.10".to_string(),
            city: "Lisbon".to_string(),
            region: "Lisbon".to_string(),
            country: "Portugal".to_string(),
            lat: 38.72,
            lon: -9.14,
            timezone: "Europe/Lisbon".to_string(),
            org: format!("Hosting for {}", host),
            asn: "AS64500".to_string(),
        }
    }
}

impl ProviderAdapter for ScriptedGeo {
    fn provider_name(&self) -> &str {
        self.name
    }
}

#[async_trait::async_trait]
impl GeoProvider for ScriptedGeo {
    async fn locate(&self, host: &str) -> Result<Geolocation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script {
            Script::Fail => Err(Error::provider(self.name, "service unavailable")),
            Script::Succeed => Ok(Self::answer(host)),
            Script::Hang => {
                hang().await;
                Err(Error::provider(self.name, "woke up"))
            }
        }
    }
}

/// A DNS resolver with scripted behaviour that records every query
pub struct ScriptedResolver {
    name: &'static str,
    script: Script,
    a: Vec<String>,
    fails_on: Option<DnsRecordType>,
    queries: Mutex<Vec<(String, DnsRecordType)>>,
}

impl ScriptedResolver {
    /// A resolver answering every record type
    pub fn new(name: &'static str, script: Script) -> Arc<Self> {
        Self::with_a(name, script, vec!["192.0.2.10".to_string()])
    }

    /// A resolver whose A answer is `a` (possibly empty)
    pub fn with_a(name: &'static str, script: Script, a: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            name,
            script,
            a,
            fails_on: None,
            queries: Mutex::new(Vec::new()),
        })
    }

    /// A resolver that answers everything except `record_type`
    pub fn failing_on(name: &'static str, record_type: DnsRecordType) -> Arc<Self> {
        Arc::new(Self {
            name,
            script: Script::Succeed,
            a: vec!["192.0.2.10".to_string()],
            fails_on: Some(record_type),
            queries: Mutex::new(Vec::new()),
        })
    }

    /// Queries received, in order
    pub fn queries(&self) -> Vec<(String, DnsRecordType)> {
        self.queries.lock().unwrap().clone()
    }

    /// Number of queries received
    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl ProviderAdapter for ScriptedResolver {
    fn provider_name(&self) -> &str {
        self.name
    }
}

#[async_trait::async_trait]
impl DnsResolver for ScriptedResolver {
    async fn resolve(&self, name: &str, record_type: DnsRecordType) -> Result<Vec<String>> {
        self.queries
            .lock()
            .unwrap()
            .push((name.to_string(), record_type));

        if self.fails_on == Some(record_type) {
            return Err(Error::provider(self.name, "SERVFAIL"));
        }

        match self.script {
            Script::Fail => Err(Error::provider(self.name, "SERVFAIL")),
            Script::Hang => {
                hang().await;
                Err(Error::provider(self.name, "woke up"))
            }
            Script::Succeed => Ok(match record_type {
                DnsRecordType::A => self.a.clone(),
                DnsRecordType::Mx => vec![format!("10 mail.{}.", name)],
                DnsRecordType::Ns => vec![format!("ns1.{}.", name), "ns2.example.net.".to_string()],
                DnsRecordType::Txt if name.starts_with("_dmarc.") => {
                    vec!["v=DMARC1; p=reject".to_string()]
                }
                DnsRecordType::Txt => vec!["v=spf1 include:_spf.google.com ~all".to_string()],
            }),
        }
    }
}

/// A probe that classifies every host the same way
pub struct FixedProbe {
    liveness: Liveness,
    calls: AtomicUsize,
}

impl FixedProbe {
    pub fn new(liveness: Liveness) -> Arc<Self> {
        Arc::new(Self {
            liveness,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProviderAdapter for FixedProbe {
    fn provider_name(&self) -> &str {
        "fixed-probe"
    }
}

#[async_trait::async_trait]
impl SubdomainProbe for FixedProbe {
    async fn probe(&self, _host: &str) -> Result<Liveness> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.liveness)
    }
}

/// Build providers from adapter lists, with a per-attempt budget
pub fn providers(
    geo: Vec<Arc<dyn GeoProvider>>,
    dns: Vec<Arc<dyn DnsResolver>>,
    probe: Arc<dyn SubdomainProbe>,
    attempt_timeout: Duration,
) -> Providers {
    let geolocation = geo
        .into_iter()
        .fold(FallbackChain::<dyn GeoProvider>::new("geolocation", attempt_timeout), |chain, a| {
            chain.with_adapter(a)
        });
    let dns = dns
        .into_iter()
        .fold(FallbackChain::<dyn DnsResolver>::new("dns", attempt_timeout), |chain, r| {
            chain.with_adapter(r)
        });
    Providers::new(geolocation, dns, probe)
}

/// Build an engine over `providers` with default pipeline settings
pub fn engine(providers: Providers) -> ReconEngine {
    engine_with(providers, PipelineConfig::default())
}

/// Build an engine over `providers` with explicit pipeline settings
pub fn engine_with(providers: Providers, pipeline: PipelineConfig) -> ReconEngine {
    ReconEngine::new(providers, pipeline).expect("engine construction succeeds")
}

/// Wait until `condition` holds, polling every few milliseconds
pub async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within 2.5s");
}
