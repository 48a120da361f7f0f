//! Reconnaissance request

use serde::{Deserialize, Serialize};

/// Person whose mailbox patterns should be guessed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first: String,
    #[serde(default)]
    pub last: String,
}

impl PersonName {
    /// Create a name
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }

    /// Parse "First Last"; extra middle words are ignored
    pub fn parse(full: &str) -> Option<Self> {
        let mut words = full.split_whitespace();
        let first = words.next()?;
        let last = words.last().unwrap_or_default();
        Some(Self::new(first, last))
    }
}

/// Input to one pipeline run
///
/// The domain is validated when the run starts, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconRequest {
    pub domain: String,

    /// Raw phone strings; formatting is stripped before classification
    #[serde(default)]
    pub phones: Vec<String>,

    #[serde(default)]
    pub person: Option<PersonName>,
}

impl ReconRequest {
    /// Request for a domain alone
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            phones: Vec::new(),
            person: None,
        }
    }

    /// Add a phone number to classify
    pub fn with_phone(mut self, raw: impl Into<String>) -> Self {
        self.phones.push(raw.into());
        self
    }

    /// Set the person whose mailbox patterns are guessed
    pub fn with_person(mut self, person: PersonName) -> Self {
        self.person = Some(person);
        self
    }
}

impl From<&str> for ReconRequest {
    fn from(domain: &str) -> Self {
        Self::new(domain)
    }
}
