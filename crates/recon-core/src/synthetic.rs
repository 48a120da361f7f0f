// # Synthetic Providers
//
// Seeded generators that satisfy the provider traits without any network
// access. Output is a pure function of (seed, provider name, request), so a
// repeated lookup returns the same answer.
//
// Addresses come from the documentation ranges (RFC 5737) so a synthetic
// report can never be mistaken for a real one.

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::report::{Geolocation, Liveness};
use crate::traits::{
    DnsRecordType, DnsResolver, DnsResolverFactory, GeoProvider, GeoProviderFactory,
    ProviderAdapter, SubdomainProbe,
};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Name used when the config does not give one
pub const SYNTHETIC_PROVIDER_NAME: &str = "synthetic";

// (city, region, country, lat, lon, timezone)
const LOCATIONS: &[(&str, &str, &str, f64, f64, &str)] = &[
    ("Ashburn", "Virginia", "United States", 39.0438, -77.4874, "America/New_York"),
    ("Frankfurt am Main", "Hesse", "Germany", 50.1109, 8.6821, "Europe/Berlin"),
    ("Amsterdam", "North Holland", "Netherlands", 52.3676, 4.9041, "Europe/Amsterdam"),
    ("São Paulo", "São Paulo", "Brazil", -23.5505, -46.6333, "America/Sao_Paulo"),
    ("Singapore", "Singapore", "Singapore", 1.3521, 103.8198, "Asia/Singapore"),
    ("Mumbai", "Maharashtra", "India", 19.0760, 72.8777, "Asia/Kolkata"),
    ("Tokyo", "Tokyo", "Japan", 35.6762, 139.6503, "Asia/Tokyo"),
];

const ORGS: &[(&str, &str)] = &[
    ("Amazon.com, Inc.", "AS16509"),
    ("Cloudflare, Inc.", "AS13335"),
    ("Google LLC", "AS15169"),
    ("Hetzner Online GmbH", "AS24940"),
    ("DigitalOcean, LLC", "AS14061"),
    ("OVH SAS", "AS16276"),
];

const MAIL_HOSTS: &[&str] = &[
    "aspmx.l.google.com",
    "{domain}.mail.protection.outlook.com",
    "mx1.{domain}",
];

const NAMESERVERS: &[(&str, &str)] = &[
    ("ns1.{domain}", "ns2.{domain}"),
    ("ada.ns.cloudflare.com", "bob.ns.cloudflare.com"),
    ("ns-101.awsdns-12.com", "ns-1290.awsdns-33.org"),
];

const SPF_INCLUDES: &[&str] = &[
    "_spf.google.com",
    "spf.protection.outlook.com",
    "sendgrid.net",
    "amazonses.com",
];

// FNV-1a; stable across platforms and releases
fn fnv1a(parts: &[&[u8]]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for part in parts {
        for byte in *part {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        hash ^= 0xff;
    }
    hash
}

fn rng_for(seed: u64, provider: &str, request: &str, salt: &str) -> StdRng {
    let seed = seed.to_le_bytes();
    let mixed = fnv1a(&[
        seed.as_slice(),
        provider.as_bytes(),
        request.as_bytes(),
        salt.as_bytes(),
    ]);
    StdRng::seed_from_u64(mixed)
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

/// Random-looking address in 198.51.100.0/24 or 203.0.113.0/24
fn documentation_address(rng: &mut StdRng) -> String {
    let prefix = if rng.random_bool(0.5) { "198.51.100" } else { "203.0.113" };
    format!("{}.{}", prefix, rng.random_range(1..=254))
}

/// Seeded geolocation generator
#[derive(Debug, Clone)]
pub struct SyntheticGeoProvider {
    name: String,
    seed: u64,
}

impl SyntheticGeoProvider {
    /// Create a generator
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            seed,
        }
    }
}

impl ProviderAdapter for SyntheticGeoProvider {
    fn provider_name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl GeoProvider for SyntheticGeoProvider {
    async fn locate(&self, host: &str) -> Result<Geolocation> {
        let mut rng = rng_for(self.seed, &self.name, host, "geo");
        let (city, region, country, lat, lon, timezone) = *pick(&mut rng, LOCATIONS);
        let (org, asn) = *pick(&mut rng, ORGS);

        Ok(Geolocation {
            ip: documentation_address(&mut rng),
            city: city.to_string(),
            region: region.to_string(),
            country: country.to_string(),
            lat,
            lon,
            timezone: timezone.to_string(),
            org: org.to_string(),
            asn: asn.to_string(),
        })
    }
}

/// Seeded record generator
///
/// Every queried name has records; names under `_dmarc.` get a DMARC policy.
#[derive(Debug, Clone)]
pub struct SyntheticDnsResolver {
    name: String,
    seed: u64,
}

impl SyntheticDnsResolver {
    /// Create a generator
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            seed,
        }
    }
}

impl ProviderAdapter for SyntheticDnsResolver {
    fn provider_name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl DnsResolver for SyntheticDnsResolver {
    async fn resolve(&self, name: &str, record_type: DnsRecordType) -> Result<Vec<String>> {
        // Per-domain choices share one generator so MX and SPF agree
        let mut rng = rng_for(self.seed, &self.name, name, "zone");
        let records = match record_type {
            DnsRecordType::A => (0..rng.random_range(1..=2))
                .map(|_| documentation_address(&mut rng))
                .collect(),
            DnsRecordType::Mx => {
                let host = pick(&mut rng, MAIL_HOSTS).replace("{domain}", name);
                vec![format!("10 {}.", host)]
            }
            DnsRecordType::Ns => {
                let (a, b) = *pick(&mut rng, NAMESERVERS);
                vec![
                    format!("{}.", a.replace("{domain}", name)),
                    format!("{}.", b.replace("{domain}", name)),
                ]
            }
            DnsRecordType::Txt => {
                if name.starts_with("_dmarc.") {
                    return Ok(vec!["v=DMARC1; p=none".to_string()]);
                }
                let include = pick(&mut rng, SPF_INCLUDES);
                let token: String = (0..16)
                    .map(|_| char::from(b'a' + rng.random_range(0..26u8)))
                    .collect();
                vec![
                    format!("v=spf1 include:{} ~all", include),
                    format!("google-site-verification={}", token),
                ]
            }
        };
        Ok(records)
    }
}

/// Seeded pseudo-liveness
#[derive(Debug, Clone)]
pub struct SyntheticProbe {
    seed: u64,
    active_ratio: f64,
}

impl SyntheticProbe {
    /// Create a probe that classifies roughly `active_ratio` of hosts active
    pub fn new(seed: u64, active_ratio: f64) -> Self {
        Self {
            seed,
            active_ratio: active_ratio.clamp(0.0, 1.0),
        }
    }
}

impl ProviderAdapter for SyntheticProbe {
    fn provider_name(&self) -> &str {
        SYNTHETIC_PROVIDER_NAME
    }
}

#[async_trait]
impl SubdomainProbe for SyntheticProbe {
    async fn probe(&self, host: &str) -> Result<Liveness> {
        let mut rng = rng_for(self.seed, SYNTHETIC_PROVIDER_NAME, host, "probe");
        Ok(if rng.random_bool(self.active_ratio) {
            Liveness::Active
        } else {
            Liveness::Inactive
        })
    }
}

/// Factory for `{"type": "synthetic"}` entries
pub struct SyntheticFactory;

impl SyntheticFactory {
    fn parts(config: &ProviderConfig) -> Result<(String, u64)> {
        match config {
            ProviderConfig::Synthetic { name, seed } => Ok((
                name.clone()
                    .unwrap_or_else(|| SYNTHETIC_PROVIDER_NAME.to_string()),
                seed.unwrap_or_default(),
            )),
            _ => Err(Error::config("Invalid config for synthetic provider")),
        }
    }
}

impl GeoProviderFactory for SyntheticFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn GeoProvider>> {
        let (name, seed) = Self::parts(config)?;
        Ok(Box::new(SyntheticGeoProvider::new(name, seed)))
    }
}

impl DnsResolverFactory for SyntheticFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsResolver>> {
        let (name, seed) = Self::parts(config)?;
        Ok(Box::new(SyntheticDnsResolver::new(name, seed)))
    }
}
