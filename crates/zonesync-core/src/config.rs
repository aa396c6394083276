//! Configuration types for zone synchronization
//!
//! Configuration can be deserialized from JSON or read from `ZONESYNC_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Settings for one zone-synchronization session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Fully-qualified zone name (e.g. `example.com.`)
    pub zone: String,

    /// Tolerate decode/validation failures while reading the zone
    #[serde(default)]
    pub lenient: bool,
}

impl SyncConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.zone.is_empty() {
            return Err(Error::config("Zone name cannot be empty"));
        }
        if !self.zone.ends_with('.') {
            return Err(Error::config(format!(
                "Zone name must be fully qualified (end with .): {}",
                self.zone
            )));
        }

        self.provider.validate()
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: SyncConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `ZONESYNC_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// ### Variables
    /// - `ZONESYNC_ZONE` (required)
    /// - `ZONESYNC_LENIENT`: `true`/`1` to enable lenient reads
    /// - `ZONESYNC_EDGEDNS_HOST`, `ZONESYNC_EDGEDNS_CLIENT_TOKEN`,
    ///   `ZONESYNC_EDGEDNS_CLIENT_SECRET`, `ZONESYNC_EDGEDNS_ACCESS_TOKEN` (required)
    /// - `ZONESYNC_EDGEDNS_CONTRACT_ID`, `ZONESYNC_EDGEDNS_GROUP_ID`,
    ///   `ZONESYNC_EDGEDNS_COMMENT` (optional)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::config(format!("{} is required", key)))
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let lenient = match optional("ZONESYNC_LENIENT") {
            None => false,
            Some(v) => match v.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(Error::config(format!(
                        "ZONESYNC_LENIENT must be true or false. Got: {}",
                        v
                    )));
                }
            },
        };

        let config = Self {
            provider: ProviderConfig::EdgeDns {
                host: required("ZONESYNC_EDGEDNS_HOST")?,
                client_token: required("ZONESYNC_EDGEDNS_CLIENT_TOKEN")?,
                client_secret: required("ZONESYNC_EDGEDNS_CLIENT_SECRET")?,
                access_token: required("ZONESYNC_EDGEDNS_ACCESS_TOKEN")?,
                contract_id: optional("ZONESYNC_EDGEDNS_CONTRACT_ID"),
                group_id: optional("ZONESYNC_EDGEDNS_GROUP_ID"),
                comment: optional("ZONESYNC_EDGEDNS_COMMENT"),
            },
            zone: required("ZONESYNC_ZONE")?,
            lenient,
        };

        config.validate()?;
        Ok(config)
    }
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Akamai Edge DNS (Zone Management API v2)
    #[serde(rename = "edgedns")]
    EdgeDns {
        /// API host, without scheme (e.g. `akab-xxxx.luna.akamaiapis.net`)
        host: String,
        /// EdgeGrid client token
        client_token: String,
        /// EdgeGrid client secret
        /// ⚠️ NEVER log this value
        client_secret: String,
        /// EdgeGrid access token
        access_token: String,
        /// Contract that owns newly created zones; only needed to create a zone
        #[serde(default)]
        contract_id: Option<String>,
        /// Group for newly created zones
        #[serde(default)]
        group_id: Option<String>,
        /// Comment attached to changelist submissions
        #[serde(default)]
        comment: Option<String>,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<()> {
        match self {
            ProviderConfig::EdgeDns {
                host,
                client_token,
                client_secret,
                access_token,
                ..
            } => {
                if host.is_empty() {
                    return Err(Error::config("Edge DNS host cannot be empty"));
                }
                if host.contains("://") || host.contains('/') {
                    return Err(Error::config(format!(
                        "Edge DNS host must be a bare hostname. Got: {}",
                        host
                    )));
                }
                if client_token.is_empty() || client_secret.is_empty() || access_token.is_empty() {
                    return Err(Error::config("Edge DNS credentials cannot be empty"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(Error::config("Custom provider factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(Error::config("Custom provider config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::EdgeDns { .. } => "edgedns",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

// Custom Debug implementation that hides credentials
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::EdgeDns {
                host,
                contract_id,
                group_id,
                comment,
                ..
            } => f
                .debug_struct("EdgeDns")
                .field("host", host)
                .field("client_token", &"<REDACTED>")
                .field("client_secret", &"<REDACTED>")
                .field("access_token", &"<REDACTED>")
                .field("contract_id", contract_id)
                .field("group_id", group_id)
                .field("comment", comment)
                .finish(),
            ProviderConfig::Custom { factory, config } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", config)
                .finish(),
        }
    }
}
