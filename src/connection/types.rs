use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use mongodb::bson::Document;

/// Default for both connect and server selection timeouts.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything needed to open a connection for one diagnostic run.
#[derive(Clone, Debug)]
pub struct ConnectionSettings {
    pub uri: String,
    pub database: String,
    pub connect_timeout: Duration,
}

impl ConnectionSettings {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Filter to push down to the server when opening a cursor.
#[derive(Clone, Debug, Default)]
pub struct ScanQuery {
    pub filter: Option<Document>,
}

impl ScanQuery {
    /// Scan the whole collection in natural order.
    pub fn all() -> Self {
        Self::default()
    }
}

/// Cancellation token for aborting long-running scans.
#[derive(Clone, Default, Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self { cancelled: Arc::new(AtomicBool::new(false)) }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
