// # Zone Provider Trait
//
// Defines the interface between the record model and a DNS hosting
// provider's API.
//
// ## Implementations
//
// - Akamai Edge DNS: `zonesync-provider-edgedns` crate
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::{Zone, ZoneProvider};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* ZoneProvider implementation */;
//
//     let mut zone = Zone::new("example.com.")?;
//     let exists = provider.populate(&mut zone, false).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::change::Plan;
use crate::record::RecordType;
use crate::zone::Zone;

/// Trait for DNS provider implementations
///
/// One provider instance synchronizes one zone at a time. Calls are awaited
/// in sequence; nothing here runs concurrently within a zone.
///
/// ## Responsibilities
/// - ✅ Read remote state into the normalized record model
/// - ✅ Execute an externally computed plan, in order
/// - ✅ Map HTTP 404 to [`crate::Error::NotFound`], keep other statuses
/// - ❌ Compute diffs (owned by the caller)
/// - ❌ Retry or back off (owned by the caller)
#[async_trait]
pub trait ZoneProvider: Send + Sync {
    /// Add the provider's records for `zone` to it.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: The zone exists remotely (even if it holds no records)
    /// - `Ok(false)`: The zone was not found; nothing was added
    /// - `Err(Error)`: Transport failure, or a decode/validation failure
    ///   while `lenient` is off
    async fn populate(&self, zone: &mut Zone, lenient: bool) -> Result<bool, crate::Error>;

    /// Apply the plan's changes in order.
    ///
    /// # Returns
    ///
    /// - `Ok(n)`: All `n` changes were applied
    /// - `Err(Error)`: The first failure; earlier changes remain applied
    async fn apply(&self, plan: &Plan) -> Result<usize, crate::Error>;

    /// Check if this provider can store the given record type
    fn supports(&self, record_type: RecordType) -> bool;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing zone providers from configuration
pub trait ZoneProviderFactory: Send + Sync {
    /// Create a ZoneProvider instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn ZoneProvider>, crate::Error>;
}
