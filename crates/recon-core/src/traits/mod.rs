//! Provider adapter traits
//!
//! Each trait wraps one capability behind a uniform request/response
//! contract. An implementation makes exactly one outbound attempt per call:
//! ordering, fallback and time budgets belong to [`crate::chain::FallbackChain`].
//!
//! - [`GeoProvider`]: host/IP -> canonical geolocation record
//! - [`DnsResolver`]: (name, record type) -> record value strings
//! - [`SubdomainProbe`]: host -> pseudo-liveness classification

pub mod dns_resolver;
pub mod geo_provider;
pub mod provider;
pub mod subdomain_probe;

pub use dns_resolver::{DnsRecordType, DnsResolver, DnsResolverFactory};
pub use geo_provider::{GeoProvider, GeoProviderFactory};
pub use provider::ProviderAdapter;
pub use subdomain_probe::SubdomainProbe;
