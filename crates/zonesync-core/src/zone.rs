//! Zone container
//!
//! A [`Zone`] holds at most one [`Record`] per name+type, keyed by the
//! zone's fully-qualified name (with trailing dot).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::{Record, RecordType};

/// A DNS zone and its records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    name: String,
    records: Vec<Record>,
}

impl Zone {
    /// Create an empty zone. `name` must be fully qualified (`example.com.`).
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.len() < 2 || !name.ends_with('.') {
            return Err(Error::validation(format!(
                "zone name \"{}\" must be fully qualified (end with .)",
                name
            )));
        }
        Ok(Self {
            name,
            records: Vec::new(),
        })
    }

    /// Fully-qualified zone name, with trailing dot
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zone name without the trailing dot, as the Edge-style APIs expect
    pub fn bare_name(&self) -> &str {
        self.name.trim_end_matches('.')
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up the record for `name` + `record_type`
    pub fn get(&self, name: &str, record_type: RecordType) -> Option<&Record> {
        self.records
            .iter()
            .find(|r| r.name == name && r.record_type() == record_type)
    }

    /// Add a record.
    ///
    /// A second record with the same name+type is always rejected. A CNAME
    /// sharing its name with any other record is rejected unless `lenient`.
    pub fn add_record(&mut self, record: Record, lenient: bool) -> Result<()> {
        let record_type = record.record_type();

        if self.get(&record.name, record_type).is_some() {
            return Err(Error::validation(format!(
                "duplicate {} record for {}",
                record_type,
                record.fqdn(&self.name)
            )));
        }

        let clashes_with_cname = self.records.iter().any(|existing| {
            existing.name == record.name
                && (existing.record_type() == RecordType::Cname
                    || record_type == RecordType::Cname)
        });
        if clashes_with_cname {
            let message = format!(
                "CNAME at {} cannot coexist with other records",
                record.fqdn(&self.name)
            );
            if !lenient {
                return Err(Error::validation(message));
            }
            tracing::warn!("{} (lenient, keeping record)", message);
        }

        self.records.push(record);
        Ok(())
    }
}
