//! Number-origin classifier
//!
//! Resolves a digit-only phone string to country, region, carrier and owner
//! metadata with two longest-prefix matches:
//!
//! 1. **Country**: calling codes are stored grouped by length. Lengths are
//!    tried longest first (3, 2, 1) and the first hit wins, so `"551"` beats
//!    `"55"` for `"5511..."` whenever both exist.
//! 2. **Region**: each country declares a fixed-width region code read from
//!    the digits immediately following the calling code. An unknown region
//!    yields the country's "unidentified" values instead of an error.
//!
//! The table is immutable once built; classification is a pure function of
//! the input.

mod builtin;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Longest calling code the table accepts
pub const MAX_COUNTRY_CODE_LEN: usize = 3;

/// Who a number is registered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerType {
    Individual,
    Business,
}

/// Resolved metadata for one phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginRecord {
    pub digits: String,
    pub country: String,
    pub country_calling_code: String,
    /// Region code that matched, if any
    pub region_code: Option<String>,
    pub carrier: String,
    pub location: String,
    pub timezone: String,
    pub owner: String,
    pub owner_type: OwnerType,
}

/// Per-region overrides; unset fields fall back to the table's defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionEntry {
    pub carrier: Option<String>,
    pub location: Option<String>,
    pub owner: Option<String>,
    pub owner_type: Option<OwnerType>,
}

/// Values reported when a region (or one of its fields) is unknown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDefaults {
    pub carrier: String,
    pub location: String,
    pub owner: String,
    pub owner_type: OwnerType,
}

impl Default for RegionDefaults {
    fn default() -> Self {
        Self {
            carrier: "Unidentified carrier".to_string(),
            location: "Unidentified location".to_string(),
            owner: "Unidentified owner".to_string(),
            owner_type: OwnerType::Individual,
        }
    }
}

/// Fixed-width region codes for one country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTable {
    width: usize,
    entries: HashMap<String, RegionEntry>,
    defaults: RegionDefaults,
}

impl RegionTable {
    /// Create an empty region table whose codes are `width` digits long
    pub fn new(width: usize) -> Self {
        Self {
            width,
            entries: HashMap::new(),
            defaults: RegionDefaults::default(),
        }
    }

    /// Replace the unidentified-region values
    pub fn with_defaults(mut self, defaults: RegionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Mutable access to the entry for `code`, creating it when absent
    pub fn entry(&mut self, code: impl Into<String>) -> &mut RegionEntry {
        self.entries.entry(code.into()).or_default()
    }

    /// Insert or replace a region entry
    pub fn insert(&mut self, code: impl Into<String>, entry: RegionEntry) {
        self.entries.insert(code.into(), entry);
    }

    /// Region code width
    pub fn width(&self) -> usize {
        self.width
    }

    fn lookup<'a>(&'a self, national: &'a str) -> (Option<&'a str>, Option<&'a RegionEntry>) {
        let Some(code) = national.get(..self.width) else {
            return (None, None);
        };
        match self.entries.get(code) {
            Some(entry) => (Some(code), Some(entry)),
            None => (None, None),
        }
    }
}

/// One calling-code entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryEntry {
    pub name: String,
    pub timezone: String,
    pub regions: Option<RegionTable>,
}

impl CountryEntry {
    /// A country with no region detail
    pub fn new(name: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timezone: timezone.into(),
            regions: None,
        }
    }

    /// Attach a region table
    pub fn with_regions(mut self, regions: RegionTable) -> Self {
        self.regions = Some(regions);
        self
    }
}

/// Calling codes grouped by code length
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberOriginTable {
    by_length: BTreeMap<usize, HashMap<String, CountryEntry>>,
}

impl NumberOriginTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide built-in table
    pub fn builtin() -> &'static NumberOriginTable {
        static TABLE: OnceLock<NumberOriginTable> = OnceLock::new();
        TABLE.get_or_init(builtin::table)
    }

    /// Register a calling code
    ///
    /// # Errors
    ///
    /// `InvalidInput` unless `code` is 1 to 3 ASCII digits.
    pub fn insert(&mut self, code: &str, entry: CountryEntry) -> Result<()> {
        if code.is_empty()
            || code.len() > MAX_COUNTRY_CODE_LEN
            || !code.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(Error::invalid_input(format!(
                "Calling code must be 1-{} digits, got '{}'",
                MAX_COUNTRY_CODE_LEN, code
            )));
        }
        self.insert_code(code, entry);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_country(mut self, code: &str, entry: CountryEntry) -> Result<Self> {
        self.insert(code, entry)?;
        Ok(self)
    }

    pub(crate) fn insert_code(&mut self, code: &str, entry: CountryEntry) {
        self.by_length
            .entry(code.len())
            .or_default()
            .insert(code.to_string(), entry);
    }

    /// Number of calling codes
    pub fn len(&self) -> usize {
        self.by_length.values().map(HashMap::len).sum()
    }

    /// Whether the table has no calling codes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the longest calling code that prefixes `digits`
    pub fn match_country<'a>(&'a self, digits: &str) -> Option<(&'a str, &'a CountryEntry)> {
        self.by_length.iter().rev().find_map(|(len, codes)| {
            let prefix = digits.get(..*len)?;
            codes
                .get_key_value(prefix)
                .map(|(code, entry)| (code.as_str(), entry))
        })
    }

    /// Classify a digit-only phone string
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `digits` contains anything but ASCII digits
    /// - `UnrecognizedCountryCode` if no 3-, 2- or 1-digit prefix is known
    pub fn classify(&self, digits: &str) -> Result<OriginRecord> {
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid_input(format!(
                "Phone number must contain digits only: '{}'",
                digits
            )));
        }

        let (code, country) = self
            .match_country(digits)
            .ok_or_else(|| Error::UnrecognizedCountryCode(digits.to_string()))?;

        let national = &digits[code.len()..];
        let fallback = RegionDefaults::default();
        let (region_code, region, defaults) = match &country.regions {
            Some(table) => {
                let (region_code, region) = table.lookup(national);
                (region_code, region, &table.defaults)
            }
            None => (None, None, &fallback),
        };

        let pick = |field: Option<&Option<String>>, default: &String| -> String {
            field
                .and_then(|value| value.as_ref())
                .unwrap_or(default)
                .clone()
        };

        Ok(OriginRecord {
            digits: digits.to_string(),
            country: country.name.clone(),
            country_calling_code: format!("+{}", code),
            region_code: region_code.map(str::to_string),
            carrier: pick(region.map(|r| &r.carrier), &defaults.carrier),
            location: pick(region.map(|r| &r.location), &defaults.location),
            timezone: country.timezone.clone(),
            owner: pick(region.map(|r| &r.owner), &defaults.owner),
            owner_type: region
                .and_then(|r| r.owner_type)
                .unwrap_or(defaults.owner_type),
        })
    }
}

/// Strip everything but ASCII digits ("+91 720-789" -> "91720789")
pub fn normalize_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Classify against the built-in table
pub fn classify(digits: &str) -> Result<OriginRecord> {
    NumberOriginTable::builtin().classify(digits)
}
