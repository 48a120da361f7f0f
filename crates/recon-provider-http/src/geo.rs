//! Geolocation over public JSON APIs
//!
//! Both services answer with a flat-ish JSON object and report lookup
//! failures in-band (HTTP 200 with an error flag), so the body is checked
//! before any field is read.

use crate::{client, get_json};
use async_trait::async_trait;
use recon_core::config::ProviderConfig;
use recon_core::report::Geolocation;
use recon_core::traits::{GeoProvider, GeoProviderFactory, ProviderAdapter};
use recon_core::{Error, Result};
use serde_json::Value;

const IPAPI_BASE: &str = "https://ipapi.co";
const IPWHOIS_BASE: &str = "https://ipwho.is";

fn text(value: &Value) -> String {
    match value {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => Geolocation::UNKNOWN.to_string(),
    }
}

fn required_ip(provider: &str, body: &Value) -> Result<String> {
    body["ip"]
        .as_str()
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::provider(provider, "Invalid response format: ip is missing"))
}

fn api_root(configured: Option<String>, default: &str) -> String {
    configured
        .as_deref()
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}

/// ipapi.co adapter
pub struct IpApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl IpApiProvider {
    const NAME: &'static str = "ipapi";

    /// Create an adapter against `base_url` (defaults to https://ipapi.co)
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: api_root(base_url, IPAPI_BASE),
            client: client(),
        }
    }

    fn parse(body: &Value) -> Result<Geolocation> {
        // {"error": true, "reason": "RateLimited", "message": "..."}
        if body["error"].as_bool().unwrap_or(false) {
            let reason = body["reason"]
                .as_str()
                .or_else(|| body["message"].as_str())
                .unwrap_or("lookup failed");
            return Err(Error::provider(Self::NAME, reason.to_string()));
        }

        Ok(Geolocation {
            ip: required_ip(Self::NAME, body)?,
            city: text(&body["city"]),
            region: text(&body["region"]),
            country: text(&body["country_name"]),
            lat: body["latitude"].as_f64().unwrap_or_default(),
            lon: body["longitude"].as_f64().unwrap_or_default(),
            timezone: text(&body["timezone"]),
            org: text(&body["org"]),
            asn: text(&body["asn"]),
        })
    }
}

impl ProviderAdapter for IpApiProvider {
    fn provider_name(&self) -> &str {
        Self::NAME
    }
}

#[async_trait]
impl GeoProvider for IpApiProvider {
    async fn locate(&self, host: &str) -> Result<Geolocation> {
        let url = format!("{}/{}/json/", self.base_url, host);
        tracing::debug!("ipapi: GET {}", url);
        let body = get_json(Self::NAME, self.client.get(&url)).await?;
        Self::parse(&body)
    }
}

/// ipwho.is adapter
pub struct IpWhoIsProvider {
    base_url: String,
    client: reqwest::Client,
}

impl IpWhoIsProvider {
    const NAME: &'static str = "ipwhois";

    /// Create an adapter against `base_url` (defaults to https://ipwho.is)
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: api_root(base_url, IPWHOIS_BASE),
            client: client(),
        }
    }

    fn parse(body: &Value) -> Result<Geolocation> {
        // {"success": false, "message": "Invalid IP address"}
        if body["success"].as_bool() == Some(false) {
            let message = body["message"].as_str().unwrap_or("lookup failed");
            return Err(Error::provider(Self::NAME, message.to_string()));
        }

        let connection = &body["connection"];
        let asn = match &connection["asn"] {
            Value::Number(n) => format!("AS{}", n),
            other => text(other),
        };

        Ok(Geolocation {
            ip: required_ip(Self::NAME, body)?,
            city: text(&body["city"]),
            region: text(&body["region"]),
            country: text(&body["country"]),
            lat: body["latitude"].as_f64().unwrap_or_default(),
            lon: body["longitude"].as_f64().unwrap_or_default(),
            timezone: text(&body["timezone"]["id"]),
            org: text(&connection["org"]),
            asn,
        })
    }
}

impl ProviderAdapter for IpWhoIsProvider {
    fn provider_name(&self) -> &str {
        Self::NAME
    }
}

#[async_trait]
impl GeoProvider for IpWhoIsProvider {
    async fn locate(&self, host: &str) -> Result<Geolocation> {
        let url = format!("{}/{}", self.base_url, host);
        tracing::debug!("ipwhois: GET {}", url);
        let body = get_json(Self::NAME, self.client.get(&url)).await?;
        Self::parse(&body)
    }
}

/// Factory for `ipapi` and `ipwhois` entries
pub struct IpGeoFactory;

impl GeoProviderFactory for IpGeoFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn GeoProvider>> {
        match config {
            ProviderConfig::Ipapi { base_url } => {
                Ok(Box::new(IpApiProvider::new(base_url.clone())))
            }
            ProviderConfig::Ipwhois { base_url } => {
                Ok(Box::new(IpWhoIsProvider::new(base_url.clone())))
            }
            _ => Err(Error::config("Invalid config for HTTP geolocation provider")),
        }
    }
}
