use super::{Stage, StageContext, StageOutput};
use crate::chain::{ChainOutcome, FallbackChain};
use crate::error::Result;
use crate::report::{Fragment, Liveness, SectionStatus, StageKind, Subdomain};
use crate::traits::{DnsRecordType, DnsResolver, ProviderAdapter, SubdomainProbe};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Candidate labels, probed in this order
pub const SUBDOMAIN_CATALOG: &[&str] = &[
    "www", "mail", "api", "blog", "shop", "dev", "staging", "admin", "portal", "app",
    "cdn", "vpn", "remote", "webmail", "smtp", "ftp", "m", "test", "ns1", "ns2",
];

/// Probes the catalog and keeps active hosts, up to the configured cap
///
/// The section is degraded when every attempted probe errored, since an
/// empty list would otherwise read as "no subdomains".
pub struct SubdomainStage;

#[async_trait]
impl Stage for SubdomainStage {
    fn kind(&self) -> StageKind {
        StageKind::Subdomains
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput> {
        let probe = &ctx.providers.probe;
        let mut active = Vec::new();
        let mut attempts = 0usize;
        let mut failures = 0usize;
        let mut last_error = None;

        for label in SUBDOMAIN_CATALOG {
            if active.len() >= ctx.max_subdomains {
                break;
            }

            let host = ctx.domain.child(label);
            attempts += 1;
            match probe.probe(&host).await {
                Ok(Liveness::Active) => active.push(Subdomain {
                    label: label.to_string(),
                    host,
                    liveness: Liveness::Active,
                }),
                Ok(Liveness::Inactive) => {}
                Err(e) => {
                    debug!("subdomains: {} failed for {}: {}", probe.provider_name(), host, e);
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error.filter(|_| failures == attempts) {
            warn!("subdomains: all {} lookups failed, last: {}", attempts, e);
            return Ok(StageOutput {
                fragment: Fragment::Subdomains(active),
                status: SectionStatus::Degraded {
                    reason: format!("every subdomain lookup failed: {}", e),
                },
            });
        }

        Ok(StageOutput {
            fragment: Fragment::Subdomains(active),
            status: SectionStatus::Sourced {
                provider: probe.provider_name().to_string(),
            },
        })
    }
}

/// Probe that treats a host as active when it has an A record
pub struct ResolverProbe {
    chain: FallbackChain<dyn DnsResolver>,
}

impl ResolverProbe {
    /// Probe through an existing resolver chain
    pub fn new(chain: FallbackChain<dyn DnsResolver>) -> Self {
        Self { chain }
    }
}

impl ProviderAdapter for ResolverProbe {
    fn provider_name(&self) -> &str {
        "dns"
    }
}

#[async_trait]
impl SubdomainProbe for ResolverProbe {
    async fn probe(&self, host: &str) -> Result<Liveness> {
        let outcome = self
            .chain
            .resolve(
                |resolver| async move { resolver.resolve(host, DnsRecordType::A).await },
                Vec::new,
            )
            .await;

        Ok(match outcome {
            ChainOutcome::Success { value, .. } if !value.is_empty() => Liveness::Active,
            _ => Liveness::Inactive,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::empty_context;
    use super::*;
    use crate::error::Error;
    use crate::stages::Providers;
    use crate::synthetic::SyntheticDnsResolver;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn keeps_active_hosts_up_to_the_cap() {
        let mut ctx = empty_context("example.com");
        ctx.max_subdomains = 3;

        let output = SubdomainStage.run(&ctx).await.unwrap();
        let Fragment::Subdomains(found) = output.fragment else {
            panic!("expected subdomains fragment");
        };
        let labels: Vec<_> = found.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["www", "mail", "api"]);
        assert_eq!(found[0].host, "www.example.com");
    }

    #[tokio::test]
    async fn resolver_probe_reports_hosts_with_addresses() {
        let chain = FallbackChain::new("dns", Duration::from_secs(1))
            .with_adapter(
                Arc::new(SyntheticDnsResolver::new("synthetic-dns", 0)) as Arc<dyn DnsResolver>
            );
        let probe = ResolverProbe::new(chain);
        assert_eq!(probe.probe("www.example.com").await.unwrap(), Liveness::Active);

        let empty = ResolverProbe::new(FallbackChain::new("dns", Duration::from_secs(1)));
        assert_eq!(empty.probe("www.example.com").await.unwrap(), Liveness::Inactive);
    }

    struct Unreachable;

    impl ProviderAdapter for Unreachable {
        fn provider_name(&self) -> &str {
            "unreachable"
        }
    }

    #[async_trait]
    impl SubdomainProbe for Unreachable {
        async fn probe(&self, host: &str) -> Result<Liveness> {
            Err(Error::provider("unreachable", format!("connection refused for {host}")))
        }
    }

    #[tokio::test]
    async fn all_lookups_failing_degrades_instead_of_reporting_none() {
        let mut ctx = empty_context("example.com");
        let synthetic = super::super::test_support::synthetic_providers();
        ctx.providers = Arc::new(Providers::new(
            synthetic.geolocation,
            synthetic.dns,
            Arc::new(Unreachable),
        ));

        let output = SubdomainStage.run(&ctx).await.unwrap();
        assert_eq!(output.fragment, Fragment::Subdomains(vec![]));
        match output.status {
            SectionStatus::Degraded { reason } => assert!(reason.contains("connection refused")),
            other => panic!("expected degraded, got {other:?}"),
        }
    }
}
