//! Test doubles and common utilities for session contract tests
//!
//! [`MockZoneProvider`] serves a fixed set of records and counts calls,
//! so tests can verify what a session forwards without any network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use zonesync_core::config::ProviderConfig;
use zonesync_core::traits::{ZoneProvider, ZoneProviderFactory};
use zonesync_core::{
    ChangeOperation, Error, Plan, Record, RecordData, RecordType, Result, Zone,
};

pub const ZONE: &str = "unit.tests.";

/// A ZoneProvider backed by canned records
#[derive(Clone)]
pub struct MockZoneProvider {
    records: Vec<Record>,
    exists: bool,
    /// Record types this provider accepts; empty means all
    supported: Vec<RecordType>,
    /// Fail every apply with this status
    fail_status: Option<u16>,
    populate_count: Arc<AtomicUsize>,
    apply_count: Arc<AtomicUsize>,
    /// Lenient flag of every populate call
    lenient_seen: Arc<Mutex<Vec<bool>>>,
    /// Plans received by apply
    applied: Arc<Mutex<Vec<Plan>>>,
}

impl MockZoneProvider {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            exists: true,
            supported: Vec::new(),
            fail_status: None,
            populate_count: Arc::new(AtomicUsize::new(0)),
            apply_count: Arc::new(AtomicUsize::new(0)),
            lenient_seen: Arc::new(Mutex::new(Vec::new())),
            applied: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider for a zone that does not exist remotely
    pub fn missing() -> Self {
        Self {
            exists: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn supporting(mut self, types: &[RecordType]) -> Self {
        self.supported = types.to_vec();
        self
    }

    pub fn failing(mut self, status: u16) -> Self {
        self.fail_status = Some(status);
        self
    }

    pub fn populate_count(&self) -> usize {
        self.populate_count.load(Ordering::SeqCst)
    }

    pub fn apply_count(&self) -> usize {
        self.apply_count.load(Ordering::SeqCst)
    }

    pub fn lenient_seen(&self) -> Vec<bool> {
        self.lenient_seen.lock().unwrap().clone()
    }

    pub fn applied(&self) -> Vec<Plan> {
        self.applied.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ZoneProvider for MockZoneProvider {
    async fn populate(&self, zone: &mut Zone, lenient: bool) -> Result<bool> {
        self.populate_count.fetch_add(1, Ordering::SeqCst);
        self.lenient_seen.lock().unwrap().push(lenient);

        for record in &self.records {
            zone.add_record(record.clone(), lenient)?;
        }
        Ok(self.exists)
    }

    async fn apply(&self, plan: &Plan) -> Result<usize> {
        self.apply_count.fetch_add(1, Ordering::SeqCst);
        self.applied.lock().unwrap().push(plan.clone());

        if let Some(status) = self.fail_status {
            return Err(Error::change_failed(
                0,
                plan.changes
                    .first()
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
                Error::transport(status, "mock failure"),
            ));
        }
        Ok(plan.changes.len())
    }

    fn supports(&self, record_type: RecordType) -> bool {
        self.supported.is_empty() || self.supported.contains(&record_type)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Factory that hands out clones of one mock, so tests keep its counters
pub struct MockFactory {
    pub provider: MockZoneProvider,
}

impl ZoneProviderFactory for MockFactory {
    fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn ZoneProvider>> {
        Ok(Box::new(self.provider.clone()))
    }
}

pub fn zone() -> Zone {
    Zone::new(ZONE).unwrap()
}

pub fn a(name: &str, ip: &str) -> Record {
    Record {
        name: name.to_string(),
        ttl: 300,
        data: RecordData::A {
            values: vec![ip.to_string()],
        },
    }
}

pub fn cname(name: &str, target: &str) -> Record {
    Record {
        name: name.to_string(),
        ttl: 300,
        data: RecordData::Cname {
            value: target.to_string(),
        },
    }
}

pub fn plan(changes: Vec<ChangeOperation>) -> Plan {
    Plan::new(zone(), changes)
}
