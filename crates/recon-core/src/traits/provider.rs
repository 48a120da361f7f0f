/// Behaviour shared by every provider adapter
///
/// # Trust Level: Untrusted
///
/// Adapters are isolated and stateless:
/// - perform one call to their own endpoint per invocation
/// - return success or failure, never retry or sleep
/// - never read or write the report
///
/// The chain that owns an adapter decides whether another adapter runs next.
pub trait ProviderAdapter: Send + Sync {
    /// Provider name (for logging and report provenance)
    fn provider_name(&self) -> &str;
}
