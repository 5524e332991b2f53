//! Diagnostic operations run against a `DiagnosticSource`.
//!
//! - `stats`: per-collection and database storage statistics
//! - `largest`: bounded top-N selection of the largest documents
//! - `profile`: profiling-log search by time window and pattern

pub mod largest;
pub mod profile;
pub mod stats;

pub use largest::{RankedDocument, largest_documents, rank_largest};
pub use profile::{ProfileEntry, ProfileFields, ProfileQuery, query_profile};
pub use stats::{
    CollectionStat, DatabaseStat, SkippedCollection, StatsOptions, StatsReport, collect_stats,
};
