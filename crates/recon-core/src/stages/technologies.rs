use super::{Stage, StageContext, StageOutput};
use crate::error::Result;
use crate::report::{Fragment, Geolocation, StageKind, Technology};
use async_trait::async_trait;

// TXT prefix -> (technology, category)
const TXT_TOKENS: &[(&str, &str, &str)] = &[
    ("google-site-verification=", "Google Search Console", "Verification"),
    ("ms=", "Microsoft 365", "Productivity"),
    ("facebook-domain-verification=", "Facebook Business", "Marketing"),
    ("apple-domain-verification=", "Apple Business", "Verification"),
    ("atlassian-domain-verification=", "Atlassian Cloud", "Collaboration"),
    ("stripe-verification=", "Stripe", "Payments"),
    ("docusign=", "DocuSign", "Productivity"),
    ("adobe-idp-site-verification=", "Adobe Identity", "Identity"),
];

// SPF include -> (technology, category)
const SPF_INCLUDES: &[(&str, &str, &str)] = &[
    ("_spf.google.com", "Google Workspace", "Email"),
    ("spf.protection.outlook.com", "Microsoft Exchange Online", "Email"),
    ("sendgrid.net", "SendGrid", "Email delivery"),
    ("mailgun.org", "Mailgun", "Email delivery"),
    ("amazonses.com", "Amazon SES", "Email delivery"),
    ("servers.mcsv.net", "Mailchimp", "Marketing"),
];

// MX host fragment -> (technology, category)
const MX_HINTS: &[(&str, &str, &str)] = &[
    ("google.com", "Google Workspace", "Email"),
    ("googlemail.com", "Google Workspace", "Email"),
    ("outlook.com", "Microsoft Exchange Online", "Email"),
    ("zoho.", "Zoho Mail", "Email"),
    ("protonmail.ch", "Proton Mail", "Email"),
    ("pphosted.com", "Proofpoint", "Email security"),
    ("mimecast.com", "Mimecast", "Email security"),
];

// NS host fragment -> (technology, category)
const NS_HINTS: &[(&str, &str, &str)] = &[
    ("cloudflare.com", "Cloudflare DNS", "DNS"),
    ("awsdns", "Amazon Route 53", "DNS"),
    ("domaincontrol.com", "GoDaddy DNS", "DNS"),
    ("azure-dns", "Azure DNS", "DNS"),
    ("googledomains.com", "Google Cloud DNS", "DNS"),
];

/// Technology fingerprints from DNS records and the hosting organization
pub struct TechnologyStage;

struct Detected(Vec<Technology>);

impl Detected {
    fn add(&mut self, name: &str, category: &str, evidence: String) {
        if self.0.iter().any(|t| t.name == name) {
            return;
        }
        self.0.push(Technology {
            name: name.to_string(),
            category: category.to_string(),
            evidence,
        });
    }

    fn scan(
        &mut self,
        values: &[String],
        hints: &[(&str, &str, &str)],
        matches: fn(&str, &str) -> bool,
        source: &str,
    ) {
        for value in values {
            let lowered = value.to_ascii_lowercase();
            for (needle, name, category) in hints {
                if matches(&lowered, needle) {
                    self.add(name, category, format!("{} record: {}", source, value));
                }
            }
        }
    }
}

fn txt_token(value: &str, prefix: &str) -> bool {
    value.trim_matches('"').starts_with(prefix)
}

fn spf_include(value: &str, include: &str) -> bool {
    value.starts_with("v=spf1")
        && value
            .split_whitespace()
            .any(|term| term.strip_prefix("include:") == Some(include))
}

fn host_contains(value: &str, fragment: &str) -> bool {
    value.contains(fragment)
}

#[async_trait]
impl Stage for TechnologyStage {
    fn kind(&self) -> StageKind {
        StageKind::Technologies
    }

    fn dependencies(&self) -> &'static [StageKind] {
        &[StageKind::Dns, StageKind::Geolocation]
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput> {
        let dns = &ctx.report.dns.data;
        let mut detected = Detected(Vec::new());

        detected.scan(&dns.txt, TXT_TOKENS, txt_token, "TXT");
        detected.scan(&dns.txt, SPF_INCLUDES, spf_include, "SPF");
        detected.scan(&dns.mx, MX_HINTS, host_contains, "MX");
        detected.scan(&dns.ns, NS_HINTS, host_contains, "NS");

        let geo = &ctx.report.geolocation.data;
        if !geo.is_fallback() && geo.org != Geolocation::UNKNOWN {
            detected.add(
                &geo.org,
                "Hosting",
                format!("Geolocation organization ({})", geo.asn),
            );
        }

        Ok(StageOutput::derived(Fragment::Technologies(detected.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context;
    use super::*;
    use crate::domain::Domain;
    use crate::report::{DnsRecords, Report, SectionStatus};

    #[tokio::test]
    async fn fingerprints_txt_mx_and_ns_once_each() {
        let mut report = Report::new(Domain::parse("acme.io").unwrap());
        report.apply(
            Fragment::Dns(DnsRecords {
                a: vec!["192.0.2.10".into()],
                mx: vec!["1 aspmx.l.google.com.".into(), "5 alt1.aspmx.l.google.com.".into()],
                ns: vec!["ada.ns.cloudflare.com.".into()],
                txt: vec![
                    "v=spf1 include:_spf.google.com include:sendgrid.net ~all".into(),
                    "\"stripe-verification=abc123\"".into(),
                ],
                ..Default::default()
            }),
            SectionStatus::Derived,
        );

        let output = TechnologyStage.run(&context("acme.io", report)).await.unwrap();
        let Fragment::Technologies(found) = output.fragment else {
            panic!("expected technologies fragment");
        };
        let names: Vec<_> = found.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Stripe", "Google Workspace", "SendGrid", "Cloudflare DNS"]);
    }

    #[tokio::test]
    async fn fallback_geolocation_adds_no_hosting_entry() {
        let report = Report::new(Domain::parse("acme.io").unwrap());
        let output = TechnologyStage.run(&context("acme.io", report)).await.unwrap();
        assert_eq!(output.fragment, Fragment::Technologies(Vec::new()));
    }
}
