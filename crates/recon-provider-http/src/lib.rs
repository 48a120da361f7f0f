// # HTTP Providers
//
// This crate provides the network-backed adapters for the recon pipeline:
//
// - **ipapi**: ipapi.co geolocation (`GET /{host}/json/`)
// - **ipwhois**: ipwho.is geolocation (`GET /{host}`)
// - **doh**: DNS-over-HTTPS JSON resolvers (Google, Cloudflare, ...)
//
// ## Trust Level: Untrusted
//
// Every adapter here makes exactly one HTTP request per call and returns
// either a normalized value or an error. Fallback order, time budgets and
// defaults are owned by `recon_core::FallbackChain`; nothing in this crate
// retries, caches or spawns tasks.

mod doh;
mod geo;

pub use doh::{DohFactory, DohResolver};
pub use geo::{IpApiProvider, IpGeoFactory, IpWhoIsProvider};

use recon_core::{Error, ProviderRegistry, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Transport-level timeout; the chain's per-attempt budget is usually tighter
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every request
const USER_AGENT: &str = concat!("recon/", env!("CARGO_PKG_VERSION"));

/// Register every HTTP adapter with a registry
pub fn register(registry: &ProviderRegistry) {
    registry.register_geo_provider("ipapi", Box::new(IpGeoFactory));
    registry.register_geo_provider("ipwhois", Box::new(IpGeoFactory));
    registry.register_dns_resolver("doh", Box::new(DohFactory));
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_HTTP_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_default()
}

/// Issue one GET and decode the JSON body
async fn get_json(provider: &str, request: reqwest::RequestBuilder) -> Result<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::provider(provider, format!("HTTP request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(status_error(provider, status));
    }

    response
        .json()
        .await
        .map_err(|e| Error::provider(provider, format!("Failed to parse response: {}", e)))
}

fn status_error(provider: &str, status: StatusCode) -> Error {
    match status.as_u16() {
        401 | 403 => Error::provider(provider, format!("Access denied. Status: {}", status)),
        404 => Error::provider(provider, format!("Not found. Status: {}", status)),
        429 => Error::provider(
            provider,
            format!("Rate limit exceeded. Please retry later. Status: {}", status),
        ),
        500..=599 => Error::provider(provider, format!("Server error (transient): {}", status)),
        _ => Error::provider(provider, format!("Unexpected status: {}", status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_adds_every_http_type() {
        let registry = ProviderRegistry::with_builtins();
        register(&registry);

        assert!(registry.has_geo_provider("ipapi"));
        assert!(registry.has_geo_provider("ipwhois"));
        assert!(registry.has_dns_resolver("doh"));
        assert!(registry.has_dns_resolver("synthetic"));
    }

    #[test]
    fn status_errors_name_the_provider() {
        let err = status_error("ipapi", StatusCode::TOO_MANY_REQUESTS);
        assert!(err.is_provider_failure());
        assert!(err.to_string().contains("ipapi"));
        assert!(err.to_string().contains("Rate limit"));
    }
}
