//! The contract diagnostics consume, and its MongoDB implementation.

use mongodb::Client;
use mongodb::bson::{Document, RawDocumentBuf};

use crate::connection::ConnectionManager;
use crate::connection::types::{CancellationToken, ConnectionSettings, ScanQuery};
use crate::error::{Error, Result};

/// Lazily evaluated documents exactly as stored; each item may fail
/// independently.
pub type DocumentStream<'a> = Box<dyn Iterator<Item = Result<RawDocumentBuf>> + 'a>;

/// A handle on one database that the diagnostic operations query.
///
/// Implementations must hand out an independent cursor for every
/// `open_cursor` call.
pub trait DiagnosticSource {
    /// Name of the database every other call targets.
    fn database_name(&self) -> &str;

    fn collection_names(&self) -> Result<Vec<String>>;

    /// Raw `collStats` output for one collection.
    fn collection_stats(&self, collection: &str) -> Result<Document>;

    /// Raw `dbStats` output for the database.
    fn database_stats(&self) -> Result<Document>;

    /// Open a lazy cursor. Sources that do not support pushdown ignore the
    /// query's filter and return every document.
    fn open_cursor(&self, collection: &str, query: ScanQuery) -> Result<DocumentStream<'_>>;

    /// Whether `open_cursor` applies the query's filter server-side.
    fn supports_pushdown(&self) -> bool {
        false
    }

    /// Whether the run has been interrupted. Checked between commands.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A live connection to one MongoDB database, scoped to a single diagnostic run.
pub struct MongoSource {
    manager: ConnectionManager,
    client: Client,
    database: String,
    cancellation: CancellationToken,
}

impl MongoSource {
    /// Connect and verify the deployment answers a ping.
    pub fn connect(settings: &ConnectionSettings) -> Result<Self> {
        if settings.database.trim().is_empty() {
            return Err(Error::invalid("database name is required"));
        }

        let manager = ConnectionManager::new()?;
        let client = manager.connect(settings)?;

        match manager.server_version(&client) {
            Ok(Some(version)) => log::info!("Connected to MongoDB {version}"),
            Ok(None) => log::info!("Connected"),
            Err(err) => log::debug!("buildInfo unavailable: {err}"),
        }

        Ok(Self {
            manager,
            client,
            database: settings.database.clone(),
            cancellation: CancellationToken::new(),
        })
    }

    /// Token that stops any scan opened through this source.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn runtime_handle(&self) -> tokio::runtime::Handle {
        self.manager.runtime_handle()
    }

    /// Release the client and its server resources.
    pub fn close(self) {
        let Self { manager, client, .. } = self;
        manager.shutdown(client);
        log::debug!("Connection closed");
    }
}

impl DiagnosticSource for MongoSource {
    fn database_name(&self) -> &str {
        &self.database
    }

    fn collection_names(&self) -> Result<Vec<String>> {
        self.manager.list_collection_names(&self.client, &self.database)
    }

    fn collection_stats(&self, collection: &str) -> Result<Document> {
        self.manager.collection_stats(&self.client, &self.database, collection)
    }

    fn database_stats(&self) -> Result<Document> {
        self.manager.database_stats(&self.client, &self.database)
    }

    fn open_cursor(&self, collection: &str, query: ScanQuery) -> Result<DocumentStream<'_>> {
        let cursor = self.manager.scan(
            &self.client,
            &self.database,
            collection,
            query,
            self.cancellation.clone(),
        )?;
        Ok(Box::new(cursor))
    }

    fn supports_pushdown(&self) -> bool {
        true
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
