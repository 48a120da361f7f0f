use super::{PLACEHOLDER_UNKNOWN, Stage, StageContext, StageOutput};
use crate::error::Result;
use crate::report::{Certificate, Fragment, StageKind};
use async_trait::async_trait;

/// Expected certificate for the domain and its active subdomains
///
/// No TLS handshake is made. Subject and SANs follow from the report;
/// issuer, validity and key algorithm are placeholders.
pub struct CertificateStage;

#[async_trait]
impl Stage for CertificateStage {
    fn kind(&self) -> StageKind {
        StageKind::Certificates
    }

    fn dependencies(&self) -> &'static [StageKind] {
        &[StageKind::Subdomains]
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput> {
        let domain = ctx.domain.as_str();
        let mut sans = vec![domain.to_string()];
        sans.extend(ctx.report.subdomains.data.iter().map(|s| s.host.clone()));

        let certificate = Certificate {
            subject: format!("CN={}", domain),
            issuer: PLACEHOLDER_UNKNOWN.to_string(),
            sans,
            valid_from: PLACEHOLDER_UNKNOWN.to_string(),
            valid_until: PLACEHOLDER_UNKNOWN.to_string(),
            key_algorithm: PLACEHOLDER_UNKNOWN.to_string(),
        };

        Ok(StageOutput::placeholder(Fragment::Certificates(vec![certificate])))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context;
    use super::*;
    use crate::domain::Domain;
    use crate::report::{Liveness, Report, SectionStatus, Subdomain};

    #[tokio::test]
    async fn sans_list_domain_then_active_subdomains() {
        let mut report = Report::new(Domain::parse("acme.io").unwrap());
        report.apply(
            Fragment::Subdomains(vec![Subdomain {
                label: "www".into(),
                host: "www.acme.io".into(),
                liveness: Liveness::Active,
            }]),
            SectionStatus::Derived,
        );

        let output = CertificateStage.run(&context("acme.io", report)).await.unwrap();
        let Fragment::Certificates(certs) = output.fragment else {
            panic!("expected certificates fragment");
        };
        assert_eq!(certs[0].subject, "CN=acme.io");
        assert_eq!(certs[0].sans, ["acme.io", "www.acme.io"]);
    }
}
