// # Zone Cache
//
// Per-provider memo of the recordsets fetched for each zone.
//
// ## Lifecycle
//
// - Absent until the first successful recordset fetch for a zone
// - A successful fetch is stored even when it holds no recordsets
// - A not-found fetch is never stored, so the next read hits the network
// - Removed after every apply against the zone

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::wire::WireRecordSet;

/// In-memory recordset cache keyed by fully-qualified zone name
#[derive(Debug, Clone, Default)]
pub struct ZoneCache {
    inner: Arc<RwLock<HashMap<String, Vec<WireRecordSet>>>>,
}

impl ZoneCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached recordsets for `zone_name`, or `None` on a miss
    pub async fn get(&self, zone_name: &str) -> Option<Vec<WireRecordSet>> {
        self.inner.read().await.get(zone_name).cloned()
    }

    /// Store the recordsets fetched for `zone_name`
    pub async fn populate(&self, zone_name: &str, records: Vec<WireRecordSet>) {
        let mut guard = self.inner.write().await;
        guard.insert(zone_name.to_string(), records);
    }

    /// Drop the entry for `zone_name`; returns whether one existed
    pub async fn invalidate(&self, zone_name: &str) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(zone_name).is_some()
    }

    pub async fn contains(&self, zone_name: &str) -> bool {
        self.inner.read().await.contains_key(zone_name)
    }

    /// Get the number of cached zones
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
