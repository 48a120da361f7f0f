use super::{Stage, StageContext, StageOutput};
use crate::error::Result;
use crate::report::{Fragment, Security, StageKind};
use crate::traits::DnsRecordType;
use async_trait::async_trait;

const SPF_MISSING_PENALTY: u8 = 30;
const SPF_PERMISSIVE_PENALTY: u8 = 20;
const DMARC_MISSING_PENALTY: u8 = 30;
const MX_MISSING_PENALTY: u8 = 10;

/// Email and DNS hygiene summary
///
/// SPF and MX come from the DNS section. DMARC lives at `_dmarc.<domain>`,
/// which is looked up here through the DNS chain unless the DNS stage
/// skipped its dependent lookups.
pub struct SecurityStage;

impl SecurityStage {
    /// `None` when every resolver failed the `_dmarc` lookup
    async fn dmarc_published(ctx: &StageContext) -> Option<bool> {
        let name = ctx.domain.child("_dmarc");
        let name = name.as_str();
        let outcome = ctx
            .providers
            .dns
            .resolve(
                |resolver| async move { resolver.resolve(name, DnsRecordType::Txt).await },
                Vec::new,
            )
            .await;

        if outcome.is_defaulted() {
            return None;
        }
        Some(outcome.value().iter().any(|v| is_dmarc(v)))
    }
}

fn is_spf(value: &str) -> bool {
    value.trim_matches('"').to_ascii_lowercase().starts_with("v=spf1")
}

fn is_dmarc(value: &str) -> bool {
    value.trim_matches('"').to_ascii_uppercase().starts_with("V=DMARC1")
}

#[async_trait]
impl Stage for SecurityStage {
    fn kind(&self) -> StageKind {
        StageKind::Security
    }

    fn dependencies(&self) -> &'static [StageKind] {
        &[StageKind::Dns]
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput> {
        let dns = &ctx.report.dns.data;
        let mut findings = Vec::new();
        let mut unverified = Vec::new();
        let mut score: u8 = 100;

        if dns.dependent_lookups_skipped {
            findings.push("DNS records unavailable; no mail policy could be checked".to_string());
        }

        let spf: Vec<&String> = dns.txt.iter().filter(|v| is_spf(v)).collect();
        if dns.lookup_defaulted(DnsRecordType::Txt) {
            unverified.push("spf".to_string());
            findings.push("TXT lookup failed; SPF not checked".to_string());
        } else if spf.is_empty() {
            score -= SPF_MISSING_PENALTY;
            findings.push("No SPF record published".to_string());
        } else if spf.iter().any(|v| v.split_whitespace().any(|term| term == "+all")) {
            score -= SPF_PERMISSIVE_PENALTY;
            findings.push("SPF record allows any sender (+all)".to_string());
        }

        let dmarc = if dns.dependent_lookups_skipped {
            Some(false)
        } else if dns.txt.iter().any(|v| is_dmarc(v)) {
            Some(true)
        } else {
            Self::dmarc_published(ctx).await
        };
        match dmarc {
            Some(true) => {}
            Some(false) => {
                score -= DMARC_MISSING_PENALTY;
                findings.push("No DMARC policy found".to_string());
            }
            None => {
                unverified.push("dmarc".to_string());
                findings.push("DMARC lookup failed; policy not checked".to_string());
            }
        }

        let mx_present = !dns.mx.is_empty();
        if dns.lookup_defaulted(DnsRecordType::Mx) {
            unverified.push("mx".to_string());
            findings.push("MX lookup failed; mail reception not checked".to_string());
        } else if !mx_present {
            score -= MX_MISSING_PENALTY;
            findings.push("No MX records; domain does not receive mail".to_string());
        }

        Ok(StageOutput::derived(Fragment::Security(Security {
            spf: !spf.is_empty(),
            dmarc: dmarc.unwrap_or(false),
            mx_present,
            score,
            findings,
            unverified,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context;
    use super::*;
    use crate::domain::Domain;
    use crate::report::{DnsRecords, Report, SectionStatus};

    fn report_with(dns: DnsRecords) -> Report {
        let mut report = Report::new(Domain::parse("acme.io").unwrap());
        report.apply(Fragment::Dns(dns), SectionStatus::Derived);
        report
    }

    async fn security(dns: DnsRecords) -> Security {
        let output = SecurityStage
            .run(&context("acme.io", report_with(dns)))
            .await
            .unwrap();
        match output.fragment {
            Fragment::Security(security) => security,
            other => panic!("expected security fragment, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn full_hygiene_scores_100() {
        // The synthetic resolver publishes a DMARC policy at _dmarc.
        let result = security(DnsRecords {
            a: vec!["192.0.2.1".into()],
            mx: vec!["10 mx.acme.io.".into()],
            txt: vec!["v=spf1 include:_spf.google.com ~all".into()],
            ..Default::default()
        })
        .await;
        assert!(result.spf && result.dmarc && result.mx_present);
        assert_eq!(result.score, 100);
        assert!(result.findings.is_empty());
    }

    #[tokio::test]
    async fn permissive_spf_is_penalized() {
        let result = security(DnsRecords {
            a: vec!["192.0.2.1".into()],
            mx: vec!["10 mx.acme.io.".into()],
            txt: vec!["v=spf1 +all".into()],
            ..Default::default()
        })
        .await;
        assert_eq!(result.score, 80);
        assert_eq!(result.findings, ["SPF record allows any sender (+all)"]);
    }

    #[tokio::test]
    async fn skipped_dns_reports_nothing_published() {
        let result = security(DnsRecords {
            dependent_lookups_skipped: true,
            ..Default::default()
        })
        .await;
        assert!(!result.spf && !result.dmarc && !result.mx_present);
        assert_eq!(result.score, 30);
        assert_eq!(result.findings.len(), 4);
        assert!(result.unverified.is_empty());
    }

    #[tokio::test]
    async fn failed_lookups_are_unverified_not_penalized() {
        let result = security(DnsRecords {
            a: vec!["192.0.2.1".into()],
            txt: vec!["v=spf1 -all".into()],
            defaulted_lookups: vec![DnsRecordType::Mx],
            ..Default::default()
        })
        .await;
        assert!(result.spf && result.dmarc);
        assert!(!result.mx_present);
        assert_eq!(result.score, 100);
        assert_eq!(result.unverified, ["mx"]);
        assert_eq!(result.findings, ["MX lookup failed; mail reception not checked"]);
    }
}
