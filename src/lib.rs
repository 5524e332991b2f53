//! Operational diagnostics for MongoDB: per-collection storage statistics,
//! the largest documents of a collection, and profiling-log search.

pub mod bson;
pub mod cli;
pub mod config;
pub mod connection;
pub mod diagnostics;
pub mod error;
pub mod helpers;
pub mod report;
