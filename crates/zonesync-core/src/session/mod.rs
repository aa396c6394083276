//! Zone synchronization session
//!
//! A [`SyncSession`] binds one provider to one zone and drives the two
//! directions of synchronization:
//!
//! ```text
//!              current()                       apply(plan)
//! ┌──────────┐ ───────▶ ┌──────────────┐ ◀──────── ┌──────────┐
//! │ provider │          │ SyncSession  │           │  caller  │
//! └──────────┘ ◀─────── └──────────────┘ ────────▶ └──────────┘
//!              writes                          Zone + exists
//! ```
//!
//! The plan itself (the diff between desired and current) is computed by
//! the caller.

use crate::change::Plan;
use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::registry::ProviderRegistry;
use crate::traits::ZoneProvider;
use crate::zone::Zone;
use tracing::{debug, info};

/// Synchronizes a single zone through a single provider
pub struct SyncSession {
    /// Provider for the zone
    provider: Box<dyn ZoneProvider>,

    /// Fully-qualified zone name
    zone_name: String,

    /// Tolerate decode/validation failures on read
    lenient: bool,
}

impl SyncSession {
    /// Create a new session
    pub fn new(provider: Box<dyn ZoneProvider>, zone_name: impl Into<String>, lenient: bool) -> Self {
        Self {
            provider,
            zone_name: zone_name.into(),
            lenient,
        }
    }

    /// Create a session from configuration, building the provider through `registry`
    pub fn from_config(registry: &ProviderRegistry, config: &SyncConfig) -> Result<Self> {
        config.validate()?;
        let provider = registry.create_provider(&config.provider)?;
        Ok(Self::new(provider, config.zone.clone(), config.lenient))
    }

    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }

    pub fn provider(&self) -> &dyn ZoneProvider {
        self.provider.as_ref()
    }

    /// Read the provider's current state of the zone
    ///
    /// Returns the populated zone and whether it exists remotely.
    pub async fn current(&self) -> Result<(Zone, bool)> {
        let mut zone = Zone::new(self.zone_name.clone())?;
        let exists = self.provider.populate(&mut zone, self.lenient).await?;

        debug!(
            "{} holds {} records for {} (exists={})",
            self.provider.provider_name(),
            zone.len(),
            self.zone_name,
            exists
        );

        Ok((zone, exists))
    }

    /// Apply an externally computed plan
    ///
    /// The plan must target this session's zone and only carry record types
    /// the provider supports. An empty plan is still handed to the provider,
    /// which checks that the zone exists.
    pub async fn apply(&self, plan: &Plan) -> Result<usize> {
        if plan.desired.name() != self.zone_name {
            return Err(Error::config(format!(
                "Plan targets {} but session manages {}",
                plan.desired.name(),
                self.zone_name
            )));
        }

        if let Some(change) = plan
            .changes
            .iter()
            .find(|c| !self.provider.supports(c.record_type()))
        {
            return Err(Error::unsupported(format!(
                "{} does not support {} ({})",
                self.provider.provider_name(),
                change.record_type(),
                change
            )));
        }

        info!(
            "Applying {} changes to {} via {}",
            plan.changes.len(),
            self.zone_name,
            self.provider.provider_name()
        );

        let applied = self.provider.apply(plan).await?;

        info!("Applied {} changes to {}", applied, self.zone_name);
        Ok(applied)
    }
}
