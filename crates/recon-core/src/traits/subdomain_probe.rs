use crate::report::Liveness;
use crate::traits::ProviderAdapter;
use async_trait::async_trait;

/// Classifies a candidate host as active or inactive
///
/// The synthetic implementation stands in for a real DNS/HTTP probe; the
/// resolver-backed one asks the DNS chain for an A record.
#[async_trait]
pub trait SubdomainProbe: ProviderAdapter {
    /// Probe one fully qualified host name
    async fn probe(&self, host: &str) -> Result<Liveness, crate::Error>;
}
