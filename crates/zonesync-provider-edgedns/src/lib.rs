// # Akamai Edge DNS Provider
//
// This crate provides an Akamai Edge DNS implementation of `ZoneProvider`.
//
// ## Components
//
// - `transport`: authenticated request/response seam (`reqwest` in production)
// - `client`: facade over the Zone Management API v2 (404 → NotFound)
// - `codec`: rdata text ↔ typed record payloads
// - `cache`: per-zone memo of fetched recordsets
// - `EdgeDnsProvider`: population (read) and apply (write)
//
// ## Behavior
//
// - ✅ One request in flight at a time, strictly in plan order
// - ✅ Missing zones are created and bootstrapped before record changes
// - ✅ Cache invalidated after every apply, successful or not
// - ❌ NO retry logic (owned by the caller)
// - ❌ NO diffing (plans come from the caller)
// - ❌ NO request signing algorithm (supplied as a `RequestSigner`)
//
// ## Security Requirements
//
// - Credentials NEVER appear in logs or Debug output

pub mod cache;
pub mod client;
pub mod codec;
pub mod transport;
pub mod wire;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use zonesync_core::config::ProviderConfig;
use zonesync_core::traits::{ZoneProvider, ZoneProviderFactory};
use zonesync_core::{ChangeOperation, Error, Plan, Record, RecordType, Result, Zone};

pub use cache::ZoneCache;
pub use client::EdgeDnsClient;
pub use codec::{RecordCodec, TXT_SEGMENT_MAX_BYTES};
pub use transport::{
    ApiRequest, ApiResponse, EdgeGridCredentials, Method, ReqwestTransport, RequestSigner,
    SignableRequest, Transport,
};
pub use wire::{RecordSetQuery, WireRecordSet, ZoneConfig};

/// Provider name used for registration and logging
pub const PROVIDER_NAME: &str = "edgedns";

/// Account settings used when a zone has to be created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeDnsSettings {
    /// Contract that owns newly created zones
    pub contract_id: Option<String>,
    /// Group for newly created zones
    pub group_id: Option<String>,
    /// Comment attached to changelist submissions
    pub comment: Option<String>,
}

/// Akamai Edge DNS zone provider
///
/// Holds the recordset cache for the zones it has read; one instance
/// processes one zone's plan at a time.
pub struct EdgeDnsProvider {
    client: EdgeDnsClient,
    codec: RecordCodec,
    cache: ZoneCache,
    contract_id: Option<String>,
    group_id: Option<String>,
}

// Custom Debug implementation; the transport holds credentials
impl fmt::Debug for EdgeDnsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeDnsProvider")
            .field("client", &self.client)
            .field("contract_id", &self.contract_id)
            .field("group_id", &self.group_id)
            .finish_non_exhaustive()
    }
}

impl EdgeDnsProvider {
    /// Create a provider talking to `host` over HTTPS
    pub fn new(
        host: &str,
        credentials: EdgeGridCredentials,
        signer: Arc<dyn RequestSigner>,
        settings: EdgeDnsSettings,
    ) -> Result<Self> {
        let transport = ReqwestTransport::new(host, credentials, signer)?;
        Ok(Self::with_transport(Arc::new(transport), settings))
    }

    /// Create a provider over an arbitrary transport
    pub fn with_transport(transport: Arc<dyn Transport>, settings: EdgeDnsSettings) -> Self {
        Self {
            client: EdgeDnsClient::new(transport, settings.comment),
            codec: RecordCodec::new(),
            cache: ZoneCache::new(),
            contract_id: settings.contract_id,
            group_id: settings.group_id,
        }
    }

    /// The provider's recordset cache
    pub fn cache(&self) -> &ZoneCache {
        &self.cache
    }

    /// Recordsets for `zone`, from the cache or the API.
    ///
    /// A not-found zone (or a reply without a recordset list) yields an
    /// empty list and is not cached.
    async fn zone_records(&self, zone: &Zone) -> Result<Vec<WireRecordSet>> {
        if let Some(records) = self.cache.get(zone.name()).await {
            debug!("zone_records: cache hit for {}", zone.name());
            return Ok(records);
        }

        let page = match self
            .client
            .zone_recordset_get(zone.bare_name(), &RecordSetQuery::default())
            .await
        {
            Ok(page) => page,
            Err(e) if e.is_not_found() => {
                debug!("zone_records: {} not found", zone.name());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        match page.recordsets {
            Some(records) => {
                self.cache.populate(zone.name(), records.clone()).await;
                Ok(records)
            }
            None => {
                warn!("zone_records: response for {} has no recordsets", zone.name());
                Ok(Vec::new())
            }
        }
    }

    /// Ensure the zone exists, then run every change in order
    async fn apply_changes(&self, plan: &Plan) -> Result<usize> {
        let zone_name = plan.desired.bare_name();

        match self.client.zone_get(zone_name).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => self.bootstrap_zone(zone_name).await?,
            Err(e) => return Err(e),
        }

        for (index, change) in plan.changes.iter().enumerate() {
            debug!("apply: {} ({}/{})", change, index + 1, plan.changes.len());
            if let Err(e) = self.apply_change(zone_name, change).await {
                error!("apply: {} failed: {}", change, e);
                return Err(Error::change_failed(index, change.to_string(), e));
            }
        }

        Ok(plan.changes.len())
    }

    /// Create a missing zone and submit a changelist so the API
    /// generates its SOA and NS records.
    async fn bootstrap_zone(&self, zone_name: &str) -> Result<()> {
        info!("Zone {} not found, creating zone", zone_name);

        let contract_id = self
            .contract_id
            .as_deref()
            .ok_or_else(|| Error::config("contractId not specified to create zone"))?;
        let params = ZoneConfig::primary(zone_name);

        self.client
            .zone_create(contract_id, &params, self.group_id.as_deref())
            .await?;

        info!("Zone {} created, generating SOA and NS records", zone_name);
        self.client.zone_changelist_create(zone_name).await?;
        self.client.zone_changelist_submit(zone_name).await?;

        Ok(())
    }

    async fn apply_change(&self, zone_name: &str, change: &ChangeOperation) -> Result<()> {
        match change {
            ChangeOperation::Create { new } => {
                let content = self.content_for(new, zone_name)?;
                self.client
                    .record_create(zone_name, &content.name, new.record_type(), &content)
                    .await
            }
            ChangeOperation::Update { new, .. } => {
                let content = self.content_for(new, zone_name)?;
                self.client
                    .record_replace(zone_name, &content.name, new.record_type(), &content)
                    .await
            }
            ChangeOperation::Delete { existing } => {
                let name = full_name(&existing.name, zone_name);
                self.client
                    .record_delete(zone_name, &name, existing.record_type())
                    .await
            }
        }
    }

    /// Request body for a create/replace of `record`
    fn content_for(&self, record: &Record, zone_name: &str) -> Result<WireRecordSet> {
        Ok(WireRecordSet {
            name: full_name(&record.name, zone_name),
            record_type: record.record_type().to_string(),
            ttl: record.ttl,
            rdata: self.codec.encode(&record.data)?,
        })
    }
}

/// `name.zone`, or the bare zone for the apex
fn full_name(name: &str, zone_name: &str) -> String {
    if name.is_empty() {
        zone_name.to_string()
    } else {
        format!("{}.{}", name, zone_name)
    }
}

/// Name relative to `zone_name` (no trailing dot); `None` when outside the zone
fn relative_name(wire_name: &str, zone_name: &str) -> Option<String> {
    let name = wire_name.trim_end_matches('.');
    if name == zone_name {
        return Some(String::new());
    }
    name.strip_suffix(zone_name)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .map(str::to_string)
}

#[async_trait]
impl ZoneProvider for EdgeDnsProvider {
    /// Read the zone's recordsets into `zone`
    ///
    /// Recordsets are grouped by relative name and type; only the first
    /// recordset of a group is decoded. Unsupported types are skipped.
    /// With `lenient`, recordsets that fail to decode are skipped and
    /// validation failures are logged instead of returned.
    async fn populate(&self, zone: &mut Zone, lenient: bool) -> Result<bool> {
        debug!("populate: name={}", zone.name());

        let records = self.zone_records(zone).await?;

        let mut groups: BTreeMap<(String, RecordType), &WireRecordSet> = BTreeMap::new();
        for wire in &records {
            let Ok(record_type) = wire.record_type.parse::<RecordType>() else {
                debug!("populate: skipping unsupported {} {}", wire.record_type, wire.name);
                continue;
            };
            let Some(name) = relative_name(&wire.name, zone.bare_name()) else {
                warn!("populate: skipping {} outside {}", wire.name, zone.name());
                continue;
            };
            groups.entry((name, record_type)).or_insert(wire);
        }

        let before = zone.len();
        for ((name, record_type), wire) in groups {
            let data = match self.codec.decode(record_type, wire) {
                Ok(data) => data,
                Err(e) if lenient => {
                    warn!("populate: skipping {} {}: {}", record_type, wire.name, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let record = Record::new(zone.name(), name, wire.ttl, data, lenient)?;
            zone.add_record(record, lenient)?;
        }

        let exists = self.cache.contains(zone.name()).await;
        info!(
            "populate: found {} records, exists={}",
            zone.len() - before,
            exists
        );

        Ok(exists)
    }

    /// Apply `plan` and invalidate the zone's cache entry
    ///
    /// The cache entry is dropped whether or not every change succeeded.
    async fn apply(&self, plan: &Plan) -> Result<usize> {
        debug!(
            "apply: zone={}, changes={}",
            plan.desired.name(),
            plan.changes.len()
        );

        let result = self.apply_changes(plan).await;
        self.cache.invalidate(plan.desired.name()).await;

        result
    }

    fn supports(&self, record_type: RecordType) -> bool {
        self.codec.supports(record_type)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating Edge DNS providers
pub struct EdgeDnsFactory {
    signer: Arc<dyn RequestSigner>,
}

impl EdgeDnsFactory {
    /// Providers built by this factory sign requests with `signer`
    pub fn new(signer: Arc<dyn RequestSigner>) -> Self {
        Self { signer }
    }
}

impl ZoneProviderFactory for EdgeDnsFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ZoneProvider>> {
        match config {
            ProviderConfig::EdgeDns {
                host,
                client_token,
                client_secret,
                access_token,
                contract_id,
                group_id,
                comment,
            } => {
                config.validate()?;

                let credentials = EdgeGridCredentials {
                    client_token: client_token.clone(),
                    client_secret: client_secret.clone(),
                    access_token: access_token.clone(),
                };
                let settings = EdgeDnsSettings {
                    contract_id: contract_id.clone(),
                    group_id: group_id.clone(),
                    comment: comment.clone(),
                };

                Ok(Box::new(EdgeDnsProvider::new(
                    host,
                    credentials,
                    Arc::clone(&self.signer),
                    settings,
                )?))
            }
            _ => Err(Error::config("Invalid config for Edge DNS provider")),
        }
    }
}

/// Register the Edge DNS provider with a registry
///
/// # Example
///
/// ```rust,ignore
/// use zonesync_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// zonesync_provider_edgedns::register(&registry, signer);
/// ```
pub fn register(registry: &zonesync_core::ProviderRegistry, signer: Arc<dyn RequestSigner>) {
    registry.register_provider(PROVIDER_NAME, Box::new(EdgeDnsFactory::new(signer)));
}
