// # DNS Resolver Trait
//
// Resolves one record type for one name and returns the answer values as
// strings, in the order the resolver returned them.
//
// ## Implementations
//
// - DNS-over-HTTPS JSON API: `recon-provider-http` crate
// - Seeded synthetic generator: `recon_core::synthetic`

use crate::config::ProviderConfig;
use crate::traits::ProviderAdapter;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record types the pipeline queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    A,
    Mx,
    Ns,
    Txt,
}

impl DnsRecordType {
    /// Mnemonic as used on the wire ("A", "MX", ...)
    pub fn as_str(self) -> &'static str {
        match self {
            DnsRecordType::A => "A",
            DnsRecordType::Mx => "MX",
            DnsRecordType::Ns => "NS",
            DnsRecordType::Txt => "TXT",
        }
    }

    /// IANA type code
    pub fn code(self) -> u16 {
        match self {
            DnsRecordType::A => 1,
            DnsRecordType::Ns => 2,
            DnsRecordType::Mx => 15,
            DnsRecordType::Txt => 16,
        }
    }
}

impl fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for DNS resolvers
///
/// An empty answer (NXDOMAIN, NODATA) is `Ok(vec![])`, not an error: the
/// lookup succeeded and found nothing.
#[async_trait]
pub trait DnsResolver: ProviderAdapter {
    /// Resolve `name` for `record_type`
    async fn resolve(
        &self,
        name: &str,
        record_type: DnsRecordType,
    ) -> Result<Vec<String>, crate::Error>;
}

/// Helper trait for constructing DNS resolvers from configuration
pub trait DnsResolverFactory: Send + Sync {
    /// Create a DnsResolver instance from configuration
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsResolver>, crate::Error>;
}
