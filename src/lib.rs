//! capstat - capital project portfolio analysis
//!
//! Answers natural-language questions over a point-in-time snapshot of
//! capital project records: schedule risk, budget position, vendor
//! performance, facility resolution, and derived insights. The analysis
//! core is stateless; the CLI is a thin layer over [`engine::Engine`].

pub mod cli;
pub mod core;
pub mod engine;
pub mod records;
pub mod yaml;
