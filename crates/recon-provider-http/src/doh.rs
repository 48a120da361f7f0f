//! DNS-over-HTTPS JSON resolver
//!
//! Speaks the `application/dns-json` dialect served by Google
//! (`https://dns.google/resolve`) and Cloudflare
//! (`https://cloudflare-dns.com/dns-query`):
//!
//! ```http
//! GET {endpoint}?name=example.com&type=MX
//! Accept: application/dns-json
//! ```

use crate::{client, get_json};
use async_trait::async_trait;
use recon_core::config::ProviderConfig;
use recon_core::traits::{DnsRecordType, DnsResolver, DnsResolverFactory, ProviderAdapter};
use recon_core::{Error, Result};
use serde_json::Value;

/// RCODE 0
const STATUS_NOERROR: u64 = 0;

/// RCODE 3: the name does not exist, which is an empty answer
const STATUS_NXDOMAIN: u64 = 3;

/// DoH JSON resolver bound to one endpoint
pub struct DohResolver {
    name: String,
    endpoint: String,
    client: reqwest::Client,
}

impl DohResolver {
    /// Create a resolver for `endpoint`
    ///
    /// The provider name is `doh:<host>`, so two endpoints in one chain stay
    /// distinguishable in section provenance.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let host = reqwest::Url::parse(&endpoint)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| endpoint.clone());

        Self {
            name: format!("doh:{}", host),
            endpoint,
            client: client(),
        }
    }

    fn parse(provider: &str, body: &Value, record_type: DnsRecordType) -> Result<Vec<String>> {
        let status = body["Status"].as_u64().ok_or_else(|| {
            Error::provider(provider, "Invalid response format: Status is missing")
        })?;

        match status {
            STATUS_NOERROR => {}
            STATUS_NXDOMAIN => return Ok(Vec::new()),
            // SERVFAIL, REFUSED, ...
            rcode => {
                return Err(Error::provider(
                    provider,
                    format!("Resolver returned RCODE {}", rcode),
                ));
            }
        }

        // NODATA answers omit the Answer array entirely
        let Some(answers) = body["Answer"].as_array() else {
            return Ok(Vec::new());
        };

        let code = u64::from(record_type.code());
        Ok(answers
            .iter()
            // CNAME chains come back in the same array
            .filter(|answer| answer["type"].as_u64() == Some(code))
            .filter_map(|answer| answer["data"].as_str())
            .map(|data| match record_type {
                DnsRecordType::Txt => unquote_txt(data),
                _ => data.to_string(),
            })
            .collect())
    }
}

/// `"v=spf1 " "include:x ~all"` -> `v=spf1 include:x ~all`
fn unquote_txt(data: &str) -> String {
    data.trim()
        .trim_matches('"')
        .split("\" \"")
        .collect::<Vec<_>>()
        .concat()
}

impl ProviderAdapter for DohResolver {
    fn provider_name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl DnsResolver for DohResolver {
    async fn resolve(&self, name: &str, record_type: DnsRecordType) -> Result<Vec<String>> {
        tracing::debug!("{}: {} {}", self.name, record_type, name);

        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("name", name), ("type", record_type.as_str())])
            .header(reqwest::header::ACCEPT, "application/dns-json");

        let body = get_json(&self.name, request).await?;
        Self::parse(&self.name, &body, record_type)
    }
}

/// Factory for `doh` entries
pub struct DohFactory;

impl DnsResolverFactory for DohFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsResolver>> {
        match config {
            ProviderConfig::Doh { endpoint } => {
                if endpoint.is_empty() {
                    return Err(Error::config("DoH endpoint cannot be empty"));
                }
                Ok(Box::new(DohResolver::new(endpoint.clone())))
            }
            _ => Err(Error::config("Invalid config for DoH resolver")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_name_carries_the_endpoint_host() {
        let resolver = DohResolver::new("https://dns.google/resolve");
        assert_eq!(resolver.provider_name(), "doh:dns.google");
    }

    #[test]
    fn answers_are_filtered_by_record_type() {
        let body = json!({
            "Status": 0,
            "Answer": [
                { "name": "www.example.com.", "type": 5, "TTL": 300, "data": "example.com." },
                { "name": "example.com.", "type": 1, "TTL": 300, "data": "93.184.216.34" },
                { "name": "example.com.", "type": 1, "TTL": 300, "data": "93.184.216.35" }
            ]
        });

        let values = DohResolver::parse("doh:test", &body, DnsRecordType::A).unwrap();
        assert_eq!(values, ["93.184.216.34", "93.184.216.35"]);
    }

    #[test]
    fn txt_quotes_are_stripped_and_segments_joined() {
        let body = json!({
            "Status": 0,
            "Answer": [
                { "name": "example.com.", "type": 16, "data": "\"v=spf1 -all\"" },
                {
                    "name": "example.com.",
                    "type": 16,
                    "data": "\"google-site-\" \"verification=abc\""
                }
            ]
        });

        let values = DohResolver::parse("doh:test", &body, DnsRecordType::Txt).unwrap();
        assert_eq!(values, ["v=spf1 -all", "google-site-verification=abc"]);
    }

    #[test]
    fn nxdomain_and_nodata_are_empty_answers() {
        let nx = json!({ "Status": 3, "Authority": [] });
        assert!(DohResolver::parse("doh:test", &nx, DnsRecordType::A).unwrap().is_empty());

        let nodata = json!({ "Status": 0 });
        assert!(DohResolver::parse("doh:test", &nodata, DnsRecordType::Mx).unwrap().is_empty());
    }

    #[test]
    fn server_failure_is_an_error() {
        let servfail = json!({ "Status": 2 });
        let err = DohResolver::parse("doh:test", &servfail, DnsRecordType::Ns).unwrap_err();
        assert!(err.to_string().contains("RCODE 2"));
        assert!(DohResolver::parse("doh:test", &json!({}), DnsRecordType::Ns).is_err());
    }

    #[test]
    fn factory_rejects_other_entries() {
        let factory = DohFactory;
        let resolver = factory
            .create(&ProviderConfig::Doh {
                endpoint: "https://cloudflare-dns.com/dns-query".to_string(),
            })
            .unwrap();
        assert_eq!(resolver.provider_name(), "doh:cloudflare-dns.com");

        assert!(factory
            .create(&ProviderConfig::Ipapi { base_url: None })
            .is_err());
    }
}
