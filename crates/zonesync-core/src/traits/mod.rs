//! Core traits for zone synchronization
//!
//! - [`ZoneProvider`]: Read and write a zone through a provider API

pub mod zone_provider;

pub use zone_provider::{ZoneProvider, ZoneProviderFactory};
