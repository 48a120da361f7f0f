// # Geolocation Provider Trait
//
// Resolves a host name or IP literal to the canonical geolocation schema.
//
// ## Implementations
//
// - ipapi.co and ipwho.is: `recon-provider-http` crate
// - Seeded synthetic generator: `recon_core::synthetic`
//
// Adapters normalize their provider's field names (`country_name`,
// `latitude`, `connection.asn`, ...) into [`Geolocation`] before returning.

use crate::config::ProviderConfig;
use crate::report::Geolocation;
use crate::traits::ProviderAdapter;
use async_trait::async_trait;

/// Trait for IP-geolocation providers
#[async_trait]
pub trait GeoProvider: ProviderAdapter {
    /// Look up the location of a host or IP address
    ///
    /// # Returns
    ///
    /// - `Ok(Geolocation)`: A fully populated record
    /// - `Err(Error)`: Transport, status or parse failure; the chain moves on
    async fn locate(&self, host: &str) -> Result<Geolocation, crate::Error>;
}

/// Helper trait for constructing geolocation providers from configuration
pub trait GeoProviderFactory: Send + Sync {
    /// Create a GeoProvider instance from configuration
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn GeoProvider>, crate::Error>;
}
