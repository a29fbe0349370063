//! Core module - configuration and snapshot loading

pub mod config;
pub mod snapshot;

pub use config::{Config, EngineConfig};
pub use snapshot::{Snapshot, SnapshotError};
