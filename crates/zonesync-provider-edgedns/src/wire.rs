//! Edge DNS wire payloads
//!
//! Shapes of the JSON bodies exchanged with the Zone Management API v2.
//! Unknown fields are ignored on input.

use serde::{Deserialize, Serialize};

/// One provider recordset: every value for a name+type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecordSet {
    /// Fully-qualified name; Edge DNS omits the trailing dot
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    /// One entry per value, in the type's rdata grammar
    pub rdata: Vec<String>,
}

/// Body of `GET zones/{zone}/recordsets`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordSetPage {
    /// Absent when the API answers without a recordset list
    #[serde(default)]
    pub recordsets: Option<Vec<WireRecordSet>>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Body of `GET zones/{zone}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDescriptor {
    #[serde(default)]
    pub zone: String,
    #[serde(default, rename = "type")]
    pub zone_type: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub contract_id: Option<String>,
    #[serde(default)]
    pub activation_state: Option<String>,
}

/// Body of `POST zones`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneConfig {
    pub zone: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    pub comment: Option<String>,
    pub masters: Vec<String>,
}

impl ZoneConfig {
    /// A primary zone with no masters
    pub fn primary(zone: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            zone_type: "primary".to_string(),
            comment: None,
            masters: Vec::new(),
        }
    }
}

/// Query parameters of the recordset listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSetQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub show_all: bool,
    pub sort_by: String,
    /// Comma-separated type filter
    pub types: Option<String>,
}

impl Default for RecordSetQuery {
    fn default() -> Self {
        Self {
            page: None,
            page_size: None,
            search: None,
            show_all: true,
            sort_by: "name".to_string(),
            types: None,
        }
    }
}

impl RecordSetQuery {
    /// Query pairs in API naming; unset options are omitted
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize".to_string(), page_size.to_string()));
        }
        if let Some(ref search) = self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs.push(("showAll".to_string(), self.show_all.to_string()));
        pairs.push(("sortBy".to_string(), self.sort_by.clone()));
        if let Some(ref types) = self.types {
            pairs.push(("types".to_string(), types.clone()));
        }
        pairs
    }
}
