// # recon-core
//
// Core library for the staged domain reconnaissance pipeline.
//
// ## Architecture Overview
//
// This library turns a domain (plus optional phone numbers and a person
// name) into a single structured report:
// - **GeoProvider / DnsResolver / SubdomainProbe**: Adapter traits, one outbound call each
// - **FallbackChain**: Ordered adapters for one capability, first success wins
// - **Stage**: One pipeline unit producing one report section
// - **ReconEngine**: Runs the stages, owns the report, publishes progress
// - **ProviderRegistry**: Plugin-based registry for adapter factories
// - **NumberOriginTable**: Phone-number origin lookup, pure and synchronous
//
// ## Design Principles
//
// 1. **Always Complete**: Every section is set, sourced or synthetic, unless the run was cancelled
// 2. **Single Writer**: Stages return fragments, only the engine merges them
// 3. **Plugin-Based**: Adapters are registered by type name, no hard-coded if-else
// 4. **Library-First**: The CLI is a thin wrapper over this crate
// 5. **Explicit Provenance**: Each section records where its data came from

pub mod chain;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod registry;
pub mod report;
pub mod request;
pub mod stages;
pub mod synthetic;
pub mod traits;

// Re-export core types for convenience
pub use chain::{ChainOutcome, FallbackChain, ProviderFailure};
pub use classifier::{NumberOriginTable, OriginRecord, OwnerType, classify, normalize_digits};
pub use config::{PipelineConfig, ProbeConfig, ProviderConfig, ReconConfig, Schedule};
pub use domain::Domain;
pub use engine::{PipelineEvent, ReconEngine, ReportHandle, RunOutcome, RunStatus};
pub use error::{Error, Result};
pub use registry::ProviderRegistry;
pub use report::{Fragment, Report, Section, SectionStatus, StageKind};
pub use request::{PersonName, ReconRequest};
pub use stages::{Providers, Stage, StageContext, StageOutput};
pub use traits::{DnsRecordType, DnsResolver, GeoProvider, ProviderAdapter, SubdomainProbe};
