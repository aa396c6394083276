//! Normalized record model
//!
//! A [`Record`] is the provider-neutral description of one name+type
//! recordset inside a zone. Its payload is a [`RecordData`] variant, so the
//! "single `value` vs. list of `values`" split is fixed by the type:
//! only CNAME carries a single value.
//!
//! Names are relative to the zone. The apex is the empty string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Supported DNS record types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Caa,
    Cname,
    Mx,
    Naptr,
    Ns,
    Ptr,
    Srv,
    Sshfp,
    Txt,
}

impl RecordType {
    /// Every supported type, in wire-name order
    pub const ALL: [RecordType; 11] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Caa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Naptr,
        RecordType::Ns,
        RecordType::Ptr,
        RecordType::Srv,
        RecordType::Sshfp,
        RecordType::Txt,
    ];

    /// The record type name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Naptr => "NAPTR",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Srv => "SRV",
            RecordType::Sshfp => "SSHFP",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RecordType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::unsupported(format!("record type {}", s)))
    }
}

/// CAA value: `<flags> <tag> <value>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaaValue {
    pub flags: u8,
    pub tag: String,
    pub value: String,
}

/// MX value: `<preference> <exchange>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MxValue {
    pub preference: u16,
    pub exchange: String,
}

/// NAPTR value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NaptrValue {
    pub order: u16,
    pub preference: u16,
    pub flags: String,
    pub service: String,
    pub regexp: String,
    pub replacement: String,
}

/// SRV value: `<priority> <weight> <port> <target>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SrvValue {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

/// SSHFP value: `<algorithm> <fingerprint_type> <fingerprint>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SshfpValue {
    pub algorithm: u8,
    pub fingerprint_type: u8,
    pub fingerprint: String,
}

/// Type-specific record payload
///
/// Serialized with a `type` tag, e.g.
/// `{"type": "MX", "values": [{"preference": 10, "exchange": "mx.example.com."}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum RecordData {
    A { values: Vec<String> },
    Aaaa { values: Vec<String> },
    Caa { values: Vec<CaaValue> },
    Cname { value: String },
    Mx { values: Vec<MxValue> },
    Naptr { values: Vec<NaptrValue> },
    Ns { values: Vec<String> },
    Ptr { values: Vec<String> },
    Srv { values: Vec<SrvValue> },
    Sshfp { values: Vec<SshfpValue> },
    Txt { values: Vec<String> },
}

impl RecordData {
    /// The record type this payload belongs to
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A { .. } => RecordType::A,
            RecordData::Aaaa { .. } => RecordType::Aaaa,
            RecordData::Caa { .. } => RecordType::Caa,
            RecordData::Cname { .. } => RecordType::Cname,
            RecordData::Mx { .. } => RecordType::Mx,
            RecordData::Naptr { .. } => RecordType::Naptr,
            RecordData::Ns { .. } => RecordType::Ns,
            RecordData::Ptr { .. } => RecordType::Ptr,
            RecordData::Srv { .. } => RecordType::Srv,
            RecordData::Sshfp { .. } => RecordType::Sshfp,
            RecordData::Txt { .. } => RecordType::Txt,
        }
    }

    /// Number of value instances carried
    pub fn len(&self) -> usize {
        match self {
            RecordData::A { values }
            | RecordData::Aaaa { values }
            | RecordData::Ns { values }
            | RecordData::Ptr { values }
            | RecordData::Txt { values } => values.len(),
            RecordData::Caa { values } => values.len(),
            RecordData::Cname { .. } => 1,
            RecordData::Mx { values } => values.len(),
            RecordData::Naptr { values } => values.len(),
            RecordData::Srv { values } => values.len(),
            RecordData::Sshfp { values } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collect every reason this payload is invalid.
    fn problems(&self, name: &str) -> Vec<String> {
        let mut reasons = Vec::new();

        if self.is_empty() {
            reasons.push("missing values".to_string());
        }

        match self {
            RecordData::A { values } => {
                for v in values {
                    if v.parse::<Ipv4Addr>().is_err() {
                        reasons.push(format!("invalid IPv4 address \"{}\"", v));
                    }
                }
            }
            RecordData::Aaaa { values } => {
                for v in values {
                    if v.parse::<Ipv6Addr>().is_err() {
                        reasons.push(format!("invalid IPv6 address \"{}\"", v));
                    }
                }
            }
            RecordData::Caa { values } => {
                for v in values {
                    if v.tag.is_empty() {
                        reasons.push("CAA tag is empty".to_string());
                    }
                }
            }
            RecordData::Cname { value } => {
                if name.is_empty() {
                    reasons.push("root CNAME not allowed".to_string());
                }
                check_fqdn(&mut reasons, "CNAME value", value);
            }
            RecordData::Mx { values } => {
                for v in values {
                    check_fqdn(&mut reasons, "MX exchange", &v.exchange);
                }
            }
            RecordData::Naptr { values } => {
                for v in values {
                    if v.replacement.is_empty() {
                        reasons.push("NAPTR replacement is empty".to_string());
                    }
                }
            }
            RecordData::Ns { values } => {
                for v in values {
                    check_fqdn(&mut reasons, "NS value", v);
                }
            }
            RecordData::Ptr { values } => {
                for v in values {
                    check_fqdn(&mut reasons, "PTR value", v);
                }
            }
            RecordData::Srv { values } => {
                for v in values {
                    check_fqdn(&mut reasons, "SRV target", &v.target);
                }
            }
            RecordData::Sshfp { values } => {
                for v in values {
                    if v.fingerprint.is_empty()
                        || !v.fingerprint.chars().all(|c| c.is_ascii_hexdigit())
                    {
                        reasons.push(format!("invalid SSHFP fingerprint \"{}\"", v.fingerprint));
                    }
                }
            }
            RecordData::Txt { .. } => {}
        }

        reasons
    }
}

fn check_fqdn(reasons: &mut Vec<String>, what: &str, value: &str) {
    if !value.ends_with('.') {
        reasons.push(format!("{} \"{}\" missing trailing .", what, value));
    }
}

/// A normalized DNS record: one name+type recordset of a zone
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Name relative to the zone; `""` is the apex
    pub name: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Type-specific payload
    #[serde(flatten)]
    pub data: RecordData,
}

impl Record {
    /// Build a record for `zone_name`, validating it.
    ///
    /// With `lenient` set, validation problems are logged and the record is
    /// returned anyway; otherwise they fail with [`Error::Validation`].
    pub fn new(
        zone_name: &str,
        name: impl Into<String>,
        ttl: u32,
        data: RecordData,
        lenient: bool,
    ) -> Result<Self> {
        let record = Self {
            name: name.into(),
            ttl,
            data,
        };

        let reasons = record.problems(zone_name);
        if !reasons.is_empty() {
            let message = format!(
                "invalid record {}: {}",
                record.fqdn(zone_name),
                reasons.join(", ")
            );
            if !lenient {
                return Err(Error::validation(message));
            }
            tracing::warn!("{} (lenient, keeping record)", message);
        }

        Ok(record)
    }

    /// The record's type
    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }

    /// Fully-qualified name under `zone_name` (which ends in `.`)
    pub fn fqdn(&self, zone_name: &str) -> String {
        if self.name.is_empty() {
            zone_name.to_string()
        } else {
            format!("{}.{}", self.name, zone_name)
        }
    }

    fn problems(&self, zone_name: &str) -> Vec<String> {
        let mut reasons = Vec::new();
        let bare_zone = zone_name.trim_end_matches('.');

        if self.name.ends_with('.') {
            reasons.push("name must be relative (no trailing .)".to_string());
        }
        if !bare_zone.is_empty()
            && (self.name == bare_zone || self.name.ends_with(&format!(".{}", bare_zone)))
        {
            reasons.push("name must not include the zone".to_string());
        }
        if self.fqdn(zone_name).len() > 253 {
            reasons.push("name exceeds 253 characters".to_string());
        }

        reasons.extend(self.data.problems(&self.name));
        reasons
    }
}
