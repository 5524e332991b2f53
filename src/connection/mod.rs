//! MongoDB connection handling and the source contract diagnostics run against.
//!
//! This module provides:
//! - `ConnectionManager`: owns the Tokio runtime and performs blocking driver calls
//! - `ops`: driver operations (statistics, cursors)
//! - `source`: the `DiagnosticSource` trait and its MongoDB implementation
//! - `cursor`: a blocking, cancellable iterator over a driver cursor
//! - `types`: shared option types

pub mod cursor;
pub mod manager;
pub mod ops;
pub mod source;
pub mod types;

pub use cursor::DocumentCursor;
pub use manager::ConnectionManager;
pub use source::{DiagnosticSource, DocumentStream, MongoSource};
pub use types::{CancellationToken, ConnectionSettings, ScanQuery};
