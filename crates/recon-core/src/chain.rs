//! Ordered provider fallback
//!
//! A [`FallbackChain`] holds the adapters for one capability in a fixed
//! order. Resolving it tries each adapter once, stops at the first success,
//! and substitutes a caller-supplied default when the list is exhausted.
//! Exhaustion is an outcome ([`ChainOutcome::Defaulted`]), never an error.
//!
//! Each attempt runs under the chain's time budget; an attempt that exceeds
//! it resolves to [`Error::Timeout`] and counts as that adapter's failure.

use crate::error::{Error, Result};
use crate::report::SectionStatus;
use crate::traits::ProviderAdapter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// One failed adapter attempt, as recorded in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub reason: String,
}

/// Terminal outcome of resolving a chain
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome<T> {
    /// An adapter returned real data
    Success { value: T, provider: String },
    /// Every adapter failed (or the chain was empty)
    Defaulted {
        value: T,
        failures: Vec<ProviderFailure>,
    },
}

impl<T> ChainOutcome<T> {
    /// Borrow the carried value
    pub fn value(&self) -> &T {
        match self {
            ChainOutcome::Success { value, .. } | ChainOutcome::Defaulted { value, .. } => value,
        }
    }

    /// Take the carried value, discarding provenance
    pub fn into_value(self) -> T {
        match self {
            ChainOutcome::Success { value, .. } | ChainOutcome::Defaulted { value, .. } => value,
        }
    }

    /// Whether the value is the synthetic default
    pub fn is_defaulted(&self) -> bool {
        matches!(self, ChainOutcome::Defaulted { .. })
    }

    /// Name of the adapter that succeeded
    pub fn provider(&self) -> Option<&str> {
        match self {
            ChainOutcome::Success { provider, .. } => Some(provider),
            ChainOutcome::Defaulted { .. } => None,
        }
    }

    /// Split into the value and the matching section status
    pub fn into_parts(self) -> (T, SectionStatus) {
        match self {
            ChainOutcome::Success { value, provider } => {
                (value, SectionStatus::Sourced { provider })
            }
            ChainOutcome::Defaulted { value, failures } => {
                (value, SectionStatus::Defaulted { failures })
            }
        }
    }
}

/// Ordered list of adapters for one capability
pub struct FallbackChain<A: ?Sized> {
    capability: &'static str,
    adapters: Vec<Arc<A>>,
    attempt_timeout: Duration,
}

impl<A: ProviderAdapter + ?Sized> FallbackChain<A> {
    /// Create an empty chain
    ///
    /// # Parameters
    ///
    /// - `capability`: Name used in logs ("geolocation", "dns", ...)
    /// - `attempt_timeout`: Budget for each individual adapter call
    pub fn new(capability: &'static str, attempt_timeout: Duration) -> Self {
        Self {
            capability,
            adapters: Vec::new(),
            attempt_timeout,
        }
    }

    /// Append an adapter (builder style)
    pub fn with_adapter(mut self, adapter: Arc<A>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Append an adapter
    pub fn push(&mut self, adapter: Arc<A>) {
        self.adapters.push(adapter);
    }

    /// Capability name
    pub fn capability(&self) -> &'static str {
        self.capability
    }

    /// Number of adapters
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether the chain has no adapters
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Adapter names, in evaluation order
    pub fn provider_names(&self) -> Vec<String> {
        self.adapters
            .iter()
            .map(|a| a.provider_name().to_string())
            .collect()
    }

    /// Try each adapter in order until one succeeds
    ///
    /// # Parameters
    ///
    /// - `call`: Issues one attempt against the given adapter
    /// - `default`: Produces the capability's default when the chain is exhausted
    pub async fn resolve<T, F, Fut, D>(&self, mut call: F, default: D) -> ChainOutcome<T>
    where
        F: FnMut(Arc<A>) -> Fut,
        Fut: Future<Output = Result<T>>,
        D: FnOnce() -> T,
    {
        let mut failures = Vec::new();

        for adapter in &self.adapters {
            let provider = adapter.provider_name().to_string();
            debug!("{}: trying provider {}", self.capability, provider);

            let result =
                match tokio::time::timeout(self.attempt_timeout, call(Arc::clone(adapter))).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::timeout(provider.clone(), self.attempt_timeout)),
                };

            match result {
                Ok(value) => {
                    debug!("{}: provider {} succeeded", self.capability, provider);
                    return ChainOutcome::Success { value, provider };
                }
                Err(e) => {
                    warn!("{}: provider {} failed: {}", self.capability, provider, e);
                    failures.push(ProviderFailure {
                        provider,
                        reason: e.to_string(),
                    });
                }
            }
        }

        warn!(
            "{}: all {} provider(s) failed, using default",
            self.capability,
            self.adapters.len()
        );
        ChainOutcome::Defaulted {
            value: default(),
            failures,
        }
    }
}

impl<A: ?Sized> Clone for FallbackChain<A> {
    fn clone(&self) -> Self {
        Self {
            capability: self.capability,
            adapters: self.adapters.clone(),
            attempt_timeout: self.attempt_timeout,
        }
    }
}

impl<A: ProviderAdapter + ?Sized> fmt::Debug for FallbackChain<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackChain")
            .field("capability", &self.capability)
            .field("providers", &self.provider_names())
            .field("attempt_timeout", &self.attempt_timeout)
            .finish()
    }
}
