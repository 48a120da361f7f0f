//! Plugin-based provider registry
//!
//! The registry maps provider type names to factories, so the configured
//! fallback order can be turned into adapters without hardcoded if-else
//! chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recon_core::registry::ProviderRegistry;
//! use recon_core::config::ProviderConfig;
//!
//! let registry = ProviderRegistry::with_builtins();
//! recon_provider_http::register(&registry);
//!
//! let config = ProviderConfig::Ipapi { base_url: None };
//! let provider = registry.create_geo_provider(&config)?;
//! ```
//!
//! ## Registration
//!
//! Provider crates register themselves during initialization:
//!
//! ```rust,ignore
//! pub fn register(registry: &ProviderRegistry) {
//!     registry.register_geo_provider("ipapi", Box::new(IpApiFactory));
//! }
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::synthetic::SyntheticFactory;
use crate::traits::{DnsResolver, DnsResolverFactory, GeoProvider, GeoProviderFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Provider registry for plugin-based adapter creation
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes. Factories hold no state, so a poisoned lock is
/// recovered rather than propagated.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered geolocation provider factories
    geo_providers: RwLock<HashMap<String, Box<dyn GeoProviderFactory>>>,

    /// Registered DNS resolver factories
    dns_resolvers: RwLock<HashMap<String, Box<dyn DnsResolverFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the in-crate factories (`synthetic`)
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_geo_provider("synthetic", Box::new(SyntheticFactory));
        registry.register_dns_resolver("synthetic", Box::new(SyntheticFactory));
        registry
    }

    /// Register a geolocation provider factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "ipapi", "ipwhois")
    /// - `factory`: Factory object for creating provider instances
    pub fn register_geo_provider(
        &self,
        name: impl Into<String>,
        factory: Box<dyn GeoProviderFactory>,
    ) {
        let mut providers = self
            .geo_providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        providers.insert(name.into(), factory);
    }

    /// Register a DNS resolver factory
    ///
    /// # Parameters
    ///
    /// - `name`: Resolver type name (e.g., "doh")
    /// - `factory`: Factory object for creating resolver instances
    pub fn register_dns_resolver(
        &self,
        name: impl Into<String>,
        factory: Box<dyn DnsResolverFactory>,
    ) {
        let mut resolvers = self
            .dns_resolvers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        resolvers.insert(name.into(), factory);
    }

    /// Create a geolocation provider from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn GeoProvider>)`: Created provider instance
    /// - `Err(Error)`: If the type is not registered or creation fails
    pub fn create_geo_provider(&self, config: &ProviderConfig) -> Result<Box<dyn GeoProvider>> {
        let provider_type = config.type_name();
        let providers = self
            .geo_providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = providers.get(provider_type).ok_or_else(|| {
            Error::config(format!("Unknown geolocation provider type: {}", provider_type))
        })?;

        factory.create(config)
    }

    /// Create a DNS resolver from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsResolver>)`: Created resolver instance
    /// - `Err(Error)`: If the type is not registered or creation fails
    pub fn create_dns_resolver(&self, config: &ProviderConfig) -> Result<Box<dyn DnsResolver>> {
        let resolver_type = config.type_name();
        let resolvers = self
            .dns_resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = resolvers.get(resolver_type).ok_or_else(|| {
            Error::config(format!("Unknown DNS resolver type: {}", resolver_type))
        })?;

        factory.create(config)
    }

    /// List all registered geolocation provider types
    pub fn list_geo_providers(&self) -> Vec<String> {
        let providers = self
            .geo_providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        providers.keys().cloned().collect()
    }

    /// List all registered DNS resolver types
    pub fn list_dns_resolvers(&self) -> Vec<String> {
        let resolvers = self
            .dns_resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        resolvers.keys().cloned().collect()
    }

    /// Check if a geolocation provider type is registered
    pub fn has_geo_provider(&self, name: &str) -> bool {
        let providers = self
            .geo_providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        providers.contains_key(name)
    }

    /// Check if a DNS resolver type is registered
    pub fn has_dns_resolver(&self, name: &str) -> bool {
        let resolvers = self
            .dns_resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        resolvers.contains_key(name)
    }
}
