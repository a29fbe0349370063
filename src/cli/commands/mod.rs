//! Command implementations

pub mod ask;
pub mod completions;
pub mod insights;
pub mod resolve;
pub mod stats;
pub mod vendor;
