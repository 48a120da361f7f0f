//! Configuration types for the recon pipeline
//!
//! This module defines all configuration structures used throughout the crate.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest per-attempt provider timeout accepted, in seconds
pub const MAX_PROVIDER_TIMEOUT_SECS: u64 = 60;

/// Main recon configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconConfig {
    /// Geolocation providers, in fallback order
    #[serde(default = "default_geolocation")]
    pub geolocation: Vec<ProviderConfig>,

    /// DNS resolvers, in fallback order
    #[serde(default = "default_dns")]
    pub dns: Vec<ProviderConfig>,

    /// How candidate subdomains are classified
    #[serde(default)]
    pub subdomain_probe: ProbeConfig,

    /// Optional pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl ReconConfig {
    /// Create a new configuration with defaults (live HTTP providers)
    pub fn new() -> Self {
        Self {
            geolocation: default_geolocation(),
            dns: default_dns(),
            subdomain_probe: ProbeConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }

    /// A configuration that never touches the network
    pub fn offline() -> Self {
        Self {
            geolocation: vec![ProviderConfig::Synthetic {
                name: Some("synthetic-geo".to_string()),
                seed: None,
            }],
            dns: vec![ProviderConfig::Synthetic {
                name: Some("synthetic-dns".to_string()),
                seed: None,
            }],
            subdomain_probe: ProbeConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }

    /// Load a configuration from a JSON file
    ///
    /// Missing sections take their defaults. The result is validated.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: ReconConfig = serde_json::from_str(&raw).map_err(|e| {
            Error::config(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Empty provider lists are allowed: the chain then always defaults.
    pub fn validate(&self) -> Result<()> {
        for provider in self.geolocation.iter().chain(&self.dns) {
            provider.validate()?;
        }
        self.subdomain_probe.validate()?;
        self.pipeline.validate()?;
        Ok(())
    }
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_geolocation() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::Ipapi { base_url: None },
        ProviderConfig::Ipwhois { base_url: None },
    ]
}

fn default_dns() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::Doh {
            endpoint: "https://dns.google/resolve".to_string(),
        },
        ProviderConfig::Doh {
            endpoint: "https://cloudflare-dns.com/dns-query".to_string(),
        },
    ]
}

/// One provider adapter entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// ipapi.co geolocation
    Ipapi {
        /// Override the API root (mainly for tests)
        #[serde(default)]
        base_url: Option<String>,
    },

    /// ipwho.is geolocation
    Ipwhois {
        /// Override the API root (mainly for tests)
        #[serde(default)]
        base_url: Option<String>,
    },

    /// DNS-over-HTTPS JSON resolver
    Doh {
        /// Resolver URL (e.g. "https://dns.google/resolve")
        endpoint: String,
    },

    /// Seeded synthetic generator (offline)
    Synthetic {
        /// Provider name reported in section provenance
        #[serde(default)]
        name: Option<String>,
        /// Generator seed
        #[serde(default)]
        seed: Option<u64>,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<()> {
        match self {
            ProviderConfig::Ipapi { base_url } | ProviderConfig::Ipwhois { base_url } => {
                if base_url.as_deref().is_some_and(str::is_empty) {
                    return Err(Error::config("Geolocation base URL cannot be empty"));
                }
                Ok(())
            }
            ProviderConfig::Doh { endpoint } => {
                if endpoint.is_empty() {
                    return Err(Error::config("DoH endpoint cannot be empty"));
                }
                if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
                    return Err(Error::config(format!(
                        "DoH endpoint must be an http(s) URL: {}",
                        endpoint
                    )));
                }
                Ok(())
            }
            ProviderConfig::Synthetic { .. } => Ok(()),
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(Error::config("Custom provider factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(Error::config("Custom provider config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name (registry key)
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Ipapi { .. } => "ipapi",
            ProviderConfig::Ipwhois { .. } => "ipwhois",
            ProviderConfig::Doh { .. } => "doh",
            ProviderConfig::Synthetic { .. } => "synthetic",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Subdomain probe selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProbeConfig {
    /// Seeded pseudo-liveness
    Synthetic {
        /// Generator seed
        #[serde(default)]
        seed: Option<u64>,
        /// Probability that a candidate is classified active
        #[serde(default = "default_active_ratio")]
        active_ratio: f64,
    },

    /// Active when the DNS chain returns at least one A record
    Dns,
}

impl ProbeConfig {
    /// Validate the probe configuration
    pub fn validate(&self) -> Result<()> {
        if let ProbeConfig::Synthetic { active_ratio, .. } = self {
            if !(0.0..=1.0).contains(active_ratio) {
                return Err(Error::config(format!(
                    "Probe active_ratio must be within 0.0..=1.0, got {}",
                    active_ratio
                )));
            }
        }
        Ok(())
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig::Synthetic {
            seed: None,
            active_ratio: default_active_ratio(),
        }
    }
}

fn default_active_ratio() -> f64 {
    0.7
}

/// Stage scheduling strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    /// One stage at a time, in canonical order
    #[default]
    Sequential,
    /// Independent stages run concurrently in dependency waves
    Dependency,
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Budget for each individual provider attempt (in seconds)
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    /// Maximum number of active subdomains retained
    #[serde(default = "default_max_subdomains")]
    pub max_subdomains: usize,

    /// Capacity of the pipeline event channel
    ///
    /// When full, new events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Stage scheduling strategy
    #[serde(default)]
    pub schedule: Schedule,
}

impl PipelineConfig {
    /// Validate the pipeline settings
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PROVIDER_TIMEOUT_SECS).contains(&self.provider_timeout_secs) {
            return Err(Error::config(format!(
                "provider_timeout_secs must be within 1..={}, got {}",
                MAX_PROVIDER_TIMEOUT_SECS, self.provider_timeout_secs
            )));
        }
        if self.max_subdomains == 0 {
            return Err(Error::config("max_subdomains must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(Error::config("event_channel_capacity must be > 0"));
        }
        Ok(())
    }

    /// Per-attempt provider timeout
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            provider_timeout_secs: default_provider_timeout_secs(),
            max_subdomains: default_max_subdomains(),
            event_channel_capacity: default_event_channel_capacity(),
            schedule: Schedule::default(),
        }
    }
}

fn default_provider_timeout_secs() -> u64 {
    8
}

fn default_max_subdomains() -> usize {
    10
}

fn default_event_channel_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(ReconConfig::default().validate().is_ok());
        assert!(ReconConfig::offline().validate().is_ok());
    }

    #[test]
    fn provider_config_is_tagged_by_type() {
        let config: ProviderConfig =
            serde_json::from_str(r#"{"type":"doh","endpoint":"https://dns.google/resolve"}"#)
                .unwrap();
        assert_eq!(config.type_name(), "doh");

        let custom: ProviderConfig =
            serde_json::from_str(r#"{"type":"custom","factory":"maxmind","config":{"db":"x"}}"#)
                .unwrap();
        assert_eq!(custom.type_name(), "maxmind");
    }

    #[test]
    fn sections_default_when_missing() {
        let config: ReconConfig =
            serde_json::from_str(r#"{"pipeline":{"schedule":"dependency"}}"#).unwrap();
        assert_eq!(config.geolocation.len(), 2);
        assert_eq!(config.pipeline.schedule, Schedule::Dependency);
        assert_eq!(config.pipeline.provider_timeout_secs, 8);
        assert_eq!(config.pipeline.max_subdomains, 10);
    }

    #[test]
    fn rejects_out_of_range_pipeline_values() {
        let mut pipeline = PipelineConfig::default();
        pipeline.provider_timeout_secs = 0;
        assert!(pipeline.validate().is_err());
        pipeline.provider_timeout_secs = 61;
        assert!(pipeline.validate().is_err());

        let pipeline = PipelineConfig {
            max_subdomains: 0,
            ..PipelineConfig::default()
        };
        assert!(pipeline.validate().is_err());
    }

    #[test]
    fn rejects_bad_provider_entries() {
        let doh = ProviderConfig::Doh {
            endpoint: "dns.google".to_string(),
        };
        assert!(doh.validate().is_err());

        let probe = ProbeConfig::Synthetic {
            seed: None,
            active_ratio: 1.5,
        };
        assert!(probe.validate().is_err());
    }
}
