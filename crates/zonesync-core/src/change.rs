//! Change operations and plans
//!
//! Plans are produced by an external diffing step; this crate only carries
//! them to a provider, which executes the changes in the given order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::{Record, RecordType};
use crate::zone::Zone;

/// A single record-level change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ChangeOperation {
    /// Create a record that does not exist remotely
    Create { new: Record },
    /// Replace an existing record
    Update { new: Record, existing: Record },
    /// Remove an existing record
    Delete { existing: Record },
}

impl ChangeOperation {
    /// The record the change acts on (`new` for Create/Update)
    pub fn record(&self) -> &Record {
        match self {
            ChangeOperation::Create { new } | ChangeOperation::Update { new, .. } => new,
            ChangeOperation::Delete { existing } => existing,
        }
    }

    /// `Create`, `Update` or `Delete`
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeOperation::Create { .. } => "Create",
            ChangeOperation::Update { .. } => "Update",
            ChangeOperation::Delete { .. } => "Delete",
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record().record_type()
    }
}

impl fmt::Display for ChangeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record();
        let name = if record.name.is_empty() { "@" } else { &record.name };
        write!(f, "{} {} {}", self.kind(), name, record.record_type())
    }
}

/// Desired zone state plus the ordered changes that reach it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub desired: Zone,
    pub changes: Vec<ChangeOperation>,
}

impl Plan {
    pub fn new(desired: Zone, changes: Vec<ChangeOperation>) -> Self {
        Self { desired, changes }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
