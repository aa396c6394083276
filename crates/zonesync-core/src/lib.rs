// # zonesync-core
//
// Core library for DNS-as-code zone synchronization.
//
// ## Architecture Overview
//
// This library provides the provider-neutral half of zone synchronization:
// - **Record model**: [`Record`], [`RecordData`] and [`RecordType`]
// - **Zone**: Container of records for one DNS namespace
// - **Plan**: Ordered [`ChangeOperation`]s computed by an external diff
// - **ZoneProvider**: Trait for reading and writing a zone via a provider API
// - **ProviderRegistry**: Plugin-based registry for zone providers
// - **SyncSession**: Drives one zone through one provider
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Record model is separate from wire formats
// 2. **Plugin-Based**: Providers are registered dynamically
// 3. **Sequential**: One zone at a time, one request in flight
// 4. **Explicit Errors**: Not-found is a distinct error kind callers branch on

pub mod change;
pub mod config;
pub mod error;
pub mod record;
pub mod registry;
pub mod session;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use change::{ChangeOperation, Plan};
pub use config::{ProviderConfig, SyncConfig};
pub use error::{Error, Result};
pub use record::{CaaValue, MxValue, NaptrValue, Record, RecordData, RecordType, SrvValue, SshfpValue};
pub use registry::ProviderRegistry;
pub use session::SyncSession;
pub use traits::{ZoneProvider, ZoneProviderFactory};
pub use zone::Zone;
