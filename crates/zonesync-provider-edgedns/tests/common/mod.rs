//! Test doubles and common utilities for Edge DNS contract tests
//!
//! [`MockTransport`] answers requests from canned rules and records every
//! request it sees, so tests can assert on exact call sequences without
//! any network.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use zonesync_core::{ChangeOperation, Error, Plan, Record, RecordData, Result, Zone};
use zonesync_provider_edgedns::{
    ApiRequest, ApiResponse, EdgeDnsProvider, EdgeDnsSettings, Method, Transport,
};

pub const ZONE: &str = "unit.tests.";

/// Recordset listing used by the populate tests
pub const RECORDS_FIXTURE: &str = include_str!("../fixtures/edgedns-records.json");

/// A canned response
struct Rule {
    method: Method,
    /// `None` matches any path
    path: Option<String>,
    status: u16,
    body: String,
}

/// A Transport that replays canned responses and records requests
///
/// Rules added later take precedence over earlier ones, so a test can set
/// a catch-all per method and then override single paths.
#[derive(Default)]
pub struct MockTransport {
    rules: Mutex<Vec<Rule>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every `method` request with `status` and `body`
    pub fn on(&self, method: Method, status: u16, body: &str) -> &Self {
        self.rules.lock().unwrap().push(Rule {
            method,
            path: None,
            status,
            body: body.to_string(),
        });
        self
    }

    /// Answer `method` requests for exactly `path`
    pub fn on_path(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.rules.lock().unwrap().push(Rule {
            method,
            path: Some(path.to_string()),
            status,
            body: body.to_string(),
        });
        self
    }

    /// The usual write responses: 201 on POST, 200 on PUT, 204 on DELETE
    pub fn accept_writes(&self) -> &Self {
        self.on(Method::Post, 201, "")
            .on(Method::Put, 200, "")
            .on(Method::Delete, 204, "")
    }

    /// All requests seen so far, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Non-GET requests, in order
    pub fn writes(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::Get)
            .collect()
    }

    /// `METHOD path` of every request, for order assertions
    pub fn call_log(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let rules = self.rules.lock().unwrap();
        let rule = rules.iter().rev().find(|rule| {
            rule.method == request.method
                && rule.path.as_deref().is_none_or(|p| p == request.path)
        });

        match rule {
            Some(rule) => Ok(ApiResponse::new(rule.status, rule.body.clone())),
            None => Err(Error::http(format!(
                "no mock for {} {}",
                request.method, request.path
            ))),
        }
    }
}

/// A provider wired to `transport`
pub fn provider(transport: &Arc<MockTransport>, settings: EdgeDnsSettings) -> EdgeDnsProvider {
    EdgeDnsProvider::with_transport(transport.clone(), settings)
}

/// Settings with a contract, group and comment
pub fn full_settings() -> EdgeDnsSettings {
    EdgeDnsSettings {
        contract_id: Some("cid".to_string()),
        group_id: Some("gid".to_string()),
        comment: Some("managed by zonesync".to_string()),
    }
}

pub fn zone() -> Zone {
    Zone::new(ZONE).unwrap()
}

pub fn record(name: &str, ttl: u32, data: RecordData) -> Record {
    Record {
        name: name.to_string(),
        ttl,
        data,
    }
}

pub fn a(name: &str, ips: &[&str]) -> Record {
    record(
        name,
        300,
        RecordData::A {
            values: ips.iter().map(|s| s.to_string()).collect(),
        },
    )
}

pub fn txt(name: &str, values: &[&str]) -> Record {
    record(
        name,
        600,
        RecordData::Txt {
            values: values.iter().map(|s| s.to_string()).collect(),
        },
    )
}

pub fn create(new: Record) -> ChangeOperation {
    ChangeOperation::Create { new }
}

pub fn update(new: Record, existing: Record) -> ChangeOperation {
    ChangeOperation::Update { new, existing }
}

pub fn delete(existing: Record) -> ChangeOperation {
    ChangeOperation::Delete { existing }
}

pub fn plan(changes: Vec<ChangeOperation>) -> Plan {
    Plan::new(zone(), changes)
}
