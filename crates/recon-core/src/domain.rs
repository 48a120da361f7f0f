//! Validated investigation subject
//!
//! Basic RFC 1035 host-name validation. It's not comprehensive but catches
//! the inputs a form field typically produces by mistake.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum total length of a domain name (RFC 1035)
const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of a single label
const MAX_LABEL_LEN: usize = 63;

/// A syntactically valid, lowercased host name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Domain(String);

impl Domain {
    /// Parse and normalize a domain name
    ///
    /// Surrounding whitespace and a single trailing dot are removed and the
    /// name is lowercased before validation.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
        let domain = trimmed.to_ascii_lowercase();

        if domain.is_empty() {
            return Err(Error::invalid_input("Domain name cannot be empty"));
        }

        if domain.len() > MAX_DOMAIN_LEN {
            return Err(Error::invalid_input(format!(
                "Domain name too long: {} chars (max {})",
                domain.len(),
                MAX_DOMAIN_LEN
            )));
        }

        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 {
            return Err(Error::invalid_input(format!(
                "Domain name needs at least two labels: '{}'",
                domain
            )));
        }

        for label in labels {
            if label.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Domain name has empty label: '{}'",
                    domain
                )));
            }

            if label.len() > MAX_LABEL_LEN {
                return Err(Error::invalid_input(format!(
                    "Domain label too long: {} chars (max {}). Label: '{}'",
                    label.len(),
                    MAX_LABEL_LEN,
                    label
                )));
            }

            if !label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
            {
                return Err(Error::invalid_input(format!(
                    "Domain label contains invalid characters: '{}'",
                    label
                )));
            }

            if label.starts_with('-') || label.ends_with('-') {
                return Err(Error::invalid_input(format!(
                    "Domain label cannot start or end with hyphen: '{}'",
                    label
                )));
            }
        }

        Ok(Self(domain))
    }

    /// The normalized name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leftmost label ("example" for "example.com")
    pub fn first_label(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }

    /// Build a child host name ("www" -> "www.example.com")
    pub fn child(&self, label: &str) -> String {
        format!("{}.{}", label, self.0)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Domain {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.0
    }
}

impl std::str::FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
