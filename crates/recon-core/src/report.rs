//! Canonical report schema
//!
//! A [`Report`] is created with every section `Pending` and holding its
//! stage's default data, so it is structurally complete from the first
//! instant. The engine is the single writer: it applies one [`Fragment`] per
//! stage, in stage order, through [`Report::apply`].

use crate::chain::ProviderFailure;
use crate::classifier::OriginRecord;
use crate::domain::Domain;
use crate::traits::DnsRecordType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Report section keys, in canonical pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Geolocation,
    Dns,
    Subdomains,
    Contacts,
    Social,
    Whois,
    Technologies,
    Certificates,
    Servers,
    Ports,
    Security,
    History,
}

impl StageKind {
    /// Every section, in the order the default pipeline runs them
    pub const ALL: [StageKind; 12] = [
        StageKind::Geolocation,
        StageKind::Dns,
        StageKind::Subdomains,
        StageKind::Contacts,
        StageKind::Social,
        StageKind::Whois,
        StageKind::Technologies,
        StageKind::Certificates,
        StageKind::Servers,
        StageKind::Ports,
        StageKind::Security,
        StageKind::History,
    ];

    /// Stable name used in logs and events
    pub fn name(self) -> &'static str {
        match self {
            StageKind::Geolocation => "geolocation",
            StageKind::Dns => "dns",
            StageKind::Subdomains => "subdomains",
            StageKind::Contacts => "contacts",
            StageKind::Social => "social",
            StageKind::Whois => "whois",
            StageKind::Technologies => "technologies",
            StageKind::Certificates => "certificates",
            StageKind::Servers => "servers",
            StageKind::Ports => "ports",
            StageKind::Security => "security",
            StageKind::History => "history",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a section's data came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SectionStatus {
    /// Stage has not run (only observable on a cancelled run)
    Pending,
    /// Real data from the named provider
    Sourced { provider: String },
    /// Computed locally or from other sections
    Derived,
    /// Structurally complete synthetic values
    Placeholder,
    /// Every provider in the chain failed; deterministic default substituted
    Defaulted { failures: Vec<ProviderFailure> },
    /// The stage failed internally; default data substituted
    Degraded { reason: String },
}

impl SectionStatus {
    /// True for `Pending`
    pub fn is_pending(&self) -> bool {
        matches!(self, SectionStatus::Pending)
    }

    /// True when the data is not real provider or derived data
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self,
            SectionStatus::Placeholder
                | SectionStatus::Defaulted { .. }
                | SectionStatus::Degraded { .. }
        )
    }

    /// Short label for logs and events
    pub fn label(&self) -> &'static str {
        match self {
            SectionStatus::Pending => "pending",
            SectionStatus::Sourced { .. } => "sourced",
            SectionStatus::Derived => "derived",
            SectionStatus::Placeholder => "placeholder",
            SectionStatus::Defaulted { .. } => "defaulted",
            SectionStatus::Degraded { .. } => "degraded",
        }
    }
}

/// One report section: its data plus provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section<T> {
    pub data: T,
    pub status: SectionStatus,
}

impl<T: Default> Section<T> {
    fn pending() -> Self {
        Self {
            data: T::default(),
            status: SectionStatus::Pending,
        }
    }
}

/// Canonical geolocation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    pub ip: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub org: String,
    pub asn: String,
}

impl Geolocation {
    /// Sentinel used in place of an unknown text field
    pub const UNKNOWN: &'static str = "Unknown";

    /// The literal record substituted when every geolocation provider fails
    pub fn fallback() -> Self {
        Self {
            ip: "0.0.0.0".to_string(),
            city: Self::UNKNOWN.to_string(),
            region: Self::UNKNOWN.to_string(),
            country: Self::UNKNOWN.to_string(),
            lat: 0.0,
            lon: 0.0,
            timezone: "UTC".to_string(),
            org: Self::UNKNOWN.to_string(),
            asn: Self::UNKNOWN.to_string(),
        }
    }

    /// Whether this is the fallback record
    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

impl Default for Geolocation {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Record sets resolved for the domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecords {
    pub a: Vec<String>,
    pub mx: Vec<String>,
    pub ns: Vec<String>,
    pub txt: Vec<String>,
    /// MX/NS/TXT were not queried because the A lookup had no answer
    pub dependent_lookups_skipped: bool,
    /// Record types whose lookup exhausted the resolver chain; their list is
    /// empty because no resolver answered, not because nothing is published
    #[serde(default)]
    pub defaulted_lookups: Vec<DnsRecordType>,
}

impl DnsRecords {
    /// Whether the lookup for `record_type` failed on every resolver
    pub fn lookup_defaulted(&self, record_type: DnsRecordType) -> bool {
        self.defaulted_lookups.contains(&record_type)
    }
}

/// Pseudo-liveness of a candidate subdomain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Liveness {
    Active,
    Inactive,
}

/// An active subdomain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdomain {
    pub label: String,
    pub host: String,
    pub liveness: Liveness,
}

/// Category tag for a mailbox candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailboxCategory {
    Personal,
    Administrative,
    General,
    Support,
    Commercial,
    Security,
    Technical,
}

/// A guessed mailbox address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxCandidate {
    pub address: String,
    /// 0-100
    pub confidence: u8,
    pub category: MailboxCategory,
}

/// A supplied phone number and its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneContact {
    pub raw: String,
    pub digits: String,
    pub origin: Option<OriginRecord>,
    pub error: Option<String>,
}

/// Contact candidates for the domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contacts {
    pub mailboxes: Vec<MailboxCandidate>,
    pub phones: Vec<PhoneContact>,
}

/// A candidate social-media profile (never verified)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
    pub platform: String,
    pub handle: String,
    pub url: String,
    pub verified: bool,
}

/// Registration data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Whois {
    pub registrar: String,
    pub registrant: String,
    pub created: String,
    pub expires: String,
    pub nameservers: Vec<String>,
    pub statuses: Vec<String>,
}

/// A detected technology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub category: String,
    pub evidence: String,
}

/// TLS certificate summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub subject: String,
    pub issuer: String,
    pub sans: Vec<String>,
    pub valid_from: String,
    pub valid_until: String,
    pub key_algorithm: String,
}

/// An address serving the domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub ip: String,
    pub country: String,
    pub org: String,
    pub role: String,
}

/// An inferred service port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub port: u16,
    pub protocol: String,
    pub service: String,
    pub evidence: String,
}

/// Email/DNS hygiene summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    pub spf: bool,
    pub dmarc: bool,
    pub mx_present: bool,
    /// 0-100
    pub score: u8,
    pub findings: Vec<String>,
    /// Checks skipped because their DNS input could not be resolved
    #[serde(default)]
    pub unverified: Vec<String>,
}

/// One archived observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub date: String,
    pub note: String,
}

/// Historical observations of the domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    pub first_seen: String,
    pub snapshots: Vec<HistorySnapshot>,
}

/// The partial report contributed by one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", content = "data", rename_all = "snake_case")]
pub enum Fragment {
    Geolocation(Geolocation),
    Dns(DnsRecords),
    Subdomains(Vec<Subdomain>),
    Contacts(Contacts),
    Social(Vec<SocialProfile>),
    Whois(Whois),
    Technologies(Vec<Technology>),
    Certificates(Vec<Certificate>),
    Servers(Vec<Server>),
    Ports(Vec<Port>),
    Security(Security),
    History(History),
}

impl Fragment {
    /// The section this fragment belongs to
    pub fn kind(&self) -> StageKind {
        match self {
            Fragment::Geolocation(_) => StageKind::Geolocation,
            Fragment::Dns(_) => StageKind::Dns,
            Fragment::Subdomains(_) => StageKind::Subdomains,
            Fragment::Contacts(_) => StageKind::Contacts,
            Fragment::Social(_) => StageKind::Social,
            Fragment::Whois(_) => StageKind::Whois,
            Fragment::Technologies(_) => StageKind::Technologies,
            Fragment::Certificates(_) => StageKind::Certificates,
            Fragment::Servers(_) => StageKind::Servers,
            Fragment::Ports(_) => StageKind::Ports,
            Fragment::Security(_) => StageKind::Security,
            Fragment::History(_) => StageKind::History,
        }
    }

    /// Default data for a section, used when its stage degrades
    pub fn empty(kind: StageKind) -> Self {
        match kind {
            StageKind::Geolocation => Fragment::Geolocation(Geolocation::fallback()),
            StageKind::Dns => Fragment::Dns(DnsRecords::default()),
            StageKind::Subdomains => Fragment::Subdomains(Vec::new()),
            StageKind::Contacts => Fragment::Contacts(Contacts::default()),
            StageKind::Social => Fragment::Social(Vec::new()),
            StageKind::Whois => Fragment::Whois(Whois::default()),
            StageKind::Technologies => Fragment::Technologies(Vec::new()),
            StageKind::Certificates => Fragment::Certificates(Vec::new()),
            StageKind::Servers => Fragment::Servers(Vec::new()),
            StageKind::Ports => Fragment::Ports(Vec::new()),
            StageKind::Security => Fragment::Security(Security::default()),
            StageKind::History => Fragment::History(History::default()),
        }
    }
}

/// The consolidated reconnaissance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub domain: Domain,
    pub generated_at: DateTime<Utc>,
    pub geolocation: Section<Geolocation>,
    pub dns: Section<DnsRecords>,
    pub subdomains: Section<Vec<Subdomain>>,
    pub contacts: Section<Contacts>,
    pub social: Section<Vec<SocialProfile>>,
    pub whois: Section<Whois>,
    pub technologies: Section<Vec<Technology>>,
    pub certificates: Section<Vec<Certificate>>,
    pub servers: Section<Vec<Server>>,
    pub ports: Section<Vec<Port>>,
    pub security: Section<Security>,
    pub history: Section<History>,
}

impl Report {
    /// Create an empty report with every section pending
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            generated_at: Utc::now(),
            geolocation: Section::pending(),
            dns: Section::pending(),
            subdomains: Section::pending(),
            contacts: Section::pending(),
            social: Section::pending(),
            whois: Section::pending(),
            technologies: Section::pending(),
            certificates: Section::pending(),
            servers: Section::pending(),
            ports: Section::pending(),
            security: Section::pending(),
            history: Section::pending(),
        }
    }

    /// Merge one stage's fragment into its section
    pub fn apply(&mut self, fragment: Fragment, status: SectionStatus) {
        match fragment {
            Fragment::Geolocation(data) => self.geolocation = Section { data, status },
            Fragment::Dns(data) => self.dns = Section { data, status },
            Fragment::Subdomains(data) => self.subdomains = Section { data, status },
            Fragment::Contacts(data) => self.contacts = Section { data, status },
            Fragment::Social(data) => self.social = Section { data, status },
            Fragment::Whois(data) => self.whois = Section { data, status },
            Fragment::Technologies(data) => self.technologies = Section { data, status },
            Fragment::Certificates(data) => self.certificates = Section { data, status },
            Fragment::Servers(data) => self.servers = Section { data, status },
            Fragment::Ports(data) => self.ports = Section { data, status },
            Fragment::Security(data) => self.security = Section { data, status },
            Fragment::History(data) => self.history = Section { data, status },
        }
    }

    /// Provenance of one section
    pub fn status(&self, kind: StageKind) -> &SectionStatus {
        match kind {
            StageKind::Geolocation => &self.geolocation.status,
            StageKind::Dns => &self.dns.status,
            StageKind::Subdomains => &self.subdomains.status,
            StageKind::Contacts => &self.contacts.status,
            StageKind::Social => &self.social.status,
            StageKind::Whois => &self.whois.status,
            StageKind::Technologies => &self.technologies.status,
            StageKind::Certificates => &self.certificates.status,
            StageKind::Servers => &self.servers.status,
            StageKind::Ports => &self.ports.status,
            StageKind::Security => &self.security.status,
            StageKind::History => &self.history.status,
        }
    }

    /// Sections whose stage has not run yet
    pub fn pending_sections(&self) -> Vec<StageKind> {
        StageKind::ALL
            .into_iter()
            .filter(|kind| self.status(*kind).is_pending())
            .collect()
    }
}
