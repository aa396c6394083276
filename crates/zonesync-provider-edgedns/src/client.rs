//! Edge DNS remote client facade
//!
//! Thin wrapper that turns zone, recordset and changelist operations into
//! [`ApiRequest`]s. HTTP 404 becomes [`Error::NotFound`]; every other
//! non-2xx status becomes [`Error::Transport`] with the status preserved.
//! Nothing is retried.
//!
//! ## API Reference
//!
//! - Get zone: GET `zones/{zone}`
//! - Create zone: POST `zones?contractId=..&gid=..`
//! - List recordsets: GET `zones/{zone}/recordsets`
//! - Record: POST/PUT/DELETE `zones/{zone}/names/{name}/types/{type}`
//! - Changelists: POST `changelists?zone={zone}`, POST `changelists/{zone}/submit`

use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use zonesync_core::{Error, RecordType, Result};

use crate::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::wire::{RecordSetPage, RecordSetQuery, WireRecordSet, ZoneConfig, ZoneDescriptor};

/// Facade over the Edge DNS Zone Management API v2
#[derive(Clone)]
pub struct EdgeDnsClient {
    transport: Arc<dyn Transport>,
    /// Comment attached to changelist submissions
    comment: Option<String>,
}

impl fmt::Debug for EdgeDnsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeDnsClient")
            .field("comment", &self.comment)
            .finish_non_exhaustive()
    }
}

impl EdgeDnsClient {
    pub fn new(transport: Arc<dyn Transport>, comment: Option<String>) -> Self {
        Self { transport, comment }
    }

    /// Send a request and map its status
    async fn request(&self, operation: &str, request: ApiRequest) -> Result<ApiResponse> {
        tracing::debug!("{}: {} {}", operation, request.method, request.path);

        let response = self.transport.send(request).await?;
        check_status(operation, response)
    }

    /// GET `zones/{zone}`
    pub async fn zone_get(&self, zone: &str) -> Result<ZoneDescriptor> {
        let response = self
            .request("zone_get", ApiRequest::new(Method::Get, format!("zones/{}", zone)))
            .await?;
        parse_body(&response)
    }

    /// POST `zones?contractId=..[&gid=..]`
    pub async fn zone_create(
        &self,
        contract_id: &str,
        params: &ZoneConfig,
        group_id: Option<&str>,
    ) -> Result<()> {
        let mut request = ApiRequest::new(Method::Post, "zones")
            .with_query("contractId", contract_id)
            .with_body(serde_json::to_value(params)?);
        if let Some(gid) = group_id {
            request = request.with_query("gid", gid);
        }

        self.request("zone_create", request).await?;
        Ok(())
    }

    /// POST `changelists?zone={zone}`
    pub async fn zone_changelist_create(&self, zone: &str) -> Result<()> {
        let request = ApiRequest::new(Method::Post, "changelists")
            .with_query("zone", zone)
            .with_body(serde_json::json!({}));

        self.request("zone_changelist_create", request).await?;
        Ok(())
    }

    /// POST `changelists/{zone}/submit`, with the configured comment
    pub async fn zone_changelist_submit(&self, zone: &str) -> Result<()> {
        let mut request = ApiRequest::new(Method::Post, format!("changelists/{}/submit", zone))
            .with_body(serde_json::json!({}));
        if let Some(ref comment) = self.comment {
            request = request.with_query("comment", comment.as_str());
        }

        self.request("zone_changelist_submit", request).await?;
        Ok(())
    }

    /// GET `zones/{zone}/recordsets`
    pub async fn zone_recordset_get(
        &self,
        zone: &str,
        query: &RecordSetQuery,
    ) -> Result<RecordSetPage> {
        let mut request = ApiRequest::new(Method::Get, format!("zones/{}/recordsets", zone));
        for (key, value) in query.to_pairs() {
            request = request.with_query(key, value);
        }

        let response = self.request("zone_recordset_get", request).await?;
        parse_body(&response)
    }

    /// POST `zones/{zone}/names/{name}/types/{type}`
    pub async fn record_create(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
        content: &WireRecordSet,
    ) -> Result<()> {
        let request = ApiRequest::new(Method::Post, record_path(zone, name, record_type))
            .with_body(serde_json::to_value(content)?);

        self.request("record_create", request).await?;
        Ok(())
    }

    /// PUT `zones/{zone}/names/{name}/types/{type}`
    pub async fn record_replace(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
        content: &WireRecordSet,
    ) -> Result<()> {
        let request = ApiRequest::new(Method::Put, record_path(zone, name, record_type))
            .with_body(serde_json::to_value(content)?);

        self.request("record_replace", request).await?;
        Ok(())
    }

    /// DELETE `zones/{zone}/names/{name}/types/{type}`
    pub async fn record_delete(&self, zone: &str, name: &str, record_type: RecordType) -> Result<()> {
        let request = ApiRequest::new(Method::Delete, record_path(zone, name, record_type));

        self.request("record_delete", request).await?;
        Ok(())
    }
}

fn record_path(zone: &str, name: &str, record_type: RecordType) -> String {
    format!("zones/{}/names/{}/types/{}", zone, name, record_type)
}

/// Map a non-2xx response to an error
fn check_status(operation: &str, response: ApiResponse) -> Result<ApiResponse> {
    if response.is_success() {
        return Ok(response);
    }

    let status = response.status;
    let body = response.body;

    Err(match status {
        404 => Error::not_found(format!("{}: resource not found", operation)),
        401 | 403 => Error::transport(
            status,
            format!(
                "{}: authentication failed, invalid credentials or insufficient permissions",
                operation
            ),
        ),
        400 | 422 => Error::transport(status, format!("{}: request rejected: {}", operation, body)),
        409 => Error::transport(status, format!("{}: conflict: {}", operation, body)),
        429 => Error::transport(
            status,
            format!("{}: rate limit exceeded, retry later", operation),
        ),
        500..=599 => Error::transport(
            status,
            format!("{}: server error (transient): {}", operation, body),
        ),
        _ => Error::transport(status, format!("{} failed: {}", operation, body)),
    })
}

/// Parse a JSON body; an empty body yields the default value
fn parse_body<T: DeserializeOwned + Default>(response: &ApiResponse) -> Result<T> {
    if response.body.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(&response.body)?)
}
