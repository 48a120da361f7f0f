//! Pipeline stages
//!
//! A [`Stage`] reads the domain, the request and the report merged so far,
//! and returns one [`Fragment`] for its own section. It never writes the
//! report: the engine merges the returned [`StageOutput`].
//!
//! [`execute`] is the stage boundary. Whatever happens inside `run` (an
//! error, or a fragment for the wrong section), the caller gets a
//! structurally complete output back.

mod certificates;
mod contacts;
mod dns;
mod geolocation;
mod history;
mod ports;
mod security;
mod servers;
mod social;
mod subdomains;
mod technologies;
mod whois;

pub use certificates::CertificateStage;
pub use contacts::{ContactStage, ROLE_MAILBOXES};
pub use dns::DnsStage;
pub use geolocation::GeolocationStage;
pub use history::HistoryStage;
pub use ports::PortStage;
pub use security::SecurityStage;
pub use servers::ServerStage;
pub use social::{SOCIAL_PLATFORMS, SocialStage};
pub use subdomains::{ResolverProbe, SUBDOMAIN_CATALOG, SubdomainStage};
pub use technologies::TechnologyStage;
pub use whois::WhoisStage;

use crate::chain::{ChainOutcome, FallbackChain};
use crate::classifier::NumberOriginTable;
use crate::domain::Domain;
use crate::error::Result;
use crate::report::{Fragment, Report, SectionStatus, StageKind};
use crate::request::ReconRequest;
use crate::traits::{DnsResolver, GeoProvider, SubdomainProbe};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Text used by placeholder fields
pub const PLACEHOLDER_UNKNOWN: &str = "Unknown";

/// The adapters a run draws on
pub struct Providers {
    pub geolocation: FallbackChain<dyn GeoProvider>,
    pub dns: FallbackChain<dyn DnsResolver>,
    pub probe: Arc<dyn SubdomainProbe>,
    pub numbers: Arc<NumberOriginTable>,
}

impl Providers {
    /// Bundle chains with the built-in number-origin table
    pub fn new(
        geolocation: FallbackChain<dyn GeoProvider>,
        dns: FallbackChain<dyn DnsResolver>,
        probe: Arc<dyn SubdomainProbe>,
    ) -> Self {
        Self {
            geolocation,
            dns,
            probe,
            numbers: Arc::new(NumberOriginTable::builtin().clone()),
        }
    }

    /// Replace the number-origin table
    pub fn with_numbers(mut self, numbers: NumberOriginTable) -> Self {
        self.numbers = Arc::new(numbers);
        self
    }
}

/// Everything a stage may read
#[derive(Clone)]
pub struct StageContext {
    pub domain: Domain,
    pub request: Arc<ReconRequest>,
    /// Fragments merged before this stage started
    pub report: Arc<Report>,
    pub providers: Arc<Providers>,
    pub max_subdomains: usize,
}

/// A fragment and its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput {
    pub fragment: Fragment,
    pub status: SectionStatus,
}

impl StageOutput {
    /// Output computed from other sections or local data
    pub fn derived(fragment: Fragment) -> Self {
        Self {
            fragment,
            status: SectionStatus::Derived,
        }
    }

    /// Output made of synthetic stand-in values
    pub fn placeholder(fragment: Fragment) -> Self {
        Self {
            fragment,
            status: SectionStatus::Placeholder,
        }
    }

    /// Default data for `kind`, flagged degraded
    pub fn degraded(kind: StageKind, reason: impl Into<String>) -> Self {
        Self {
            fragment: Fragment::empty(kind),
            status: SectionStatus::Degraded {
                reason: reason.into(),
            },
        }
    }

    /// Wrap a chain outcome, keeping its provenance
    pub fn from_outcome<T>(outcome: ChainOutcome<T>, wrap: impl FnOnce(T) -> Fragment) -> Self {
        let (value, status) = outcome.into_parts();
        Self {
            fragment: wrap(value),
            status,
        }
    }
}

/// One unit of the pipeline
#[async_trait]
pub trait Stage: Send + Sync {
    /// The section this stage fills
    fn kind(&self) -> StageKind;

    /// Sections that must be merged before this stage runs
    fn dependencies(&self) -> &'static [StageKind] {
        &[]
    }

    /// Produce this stage's fragment
    async fn run(&self, ctx: &StageContext) -> Result<StageOutput>;
}

/// Run a stage behind its failure boundary
pub async fn execute(stage: &dyn Stage, ctx: &StageContext) -> StageOutput {
    let kind = stage.kind();
    match stage.run(ctx).await {
        Ok(output) if output.fragment.kind() == kind => output,
        Ok(output) => {
            let reason = format!(
                "stage returned a {} fragment instead of {}",
                output.fragment.kind(),
                kind
            );
            warn!("{}: {}", kind, reason);
            StageOutput::degraded(kind, reason)
        }
        Err(e) => {
            warn!("{}: stage degraded: {}", kind, e);
            StageOutput::degraded(kind, e.to_string())
        }
    }
}

/// The canonical stage list, in pipeline order
pub fn default_stages() -> Vec<Arc<dyn Stage>> {
    vec![
        Arc::new(GeolocationStage),
        Arc::new(DnsStage),
        Arc::new(SubdomainStage),
        Arc::new(ContactStage),
        Arc::new(SocialStage),
        Arc::new(WhoisStage),
        Arc::new(TechnologyStage),
        Arc::new(CertificateStage),
        Arc::new(ServerStage),
        Arc::new(PortStage),
        Arc::new(SecurityStage),
        Arc::new(HistoryStage),
    ]
}
