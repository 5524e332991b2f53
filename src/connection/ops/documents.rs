//! Cursor-opening operations for collection scans.

use mongodb::bson::{Document, RawDocumentBuf};
use mongodb::{Client, Cursor};

use crate::connection::ConnectionManager;
use crate::connection::cursor::DocumentCursor;
use crate::connection::types::{CancellationToken, ScanQuery};
use crate::error::Result;

impl ConnectionManager {
    /// Open a cursor over undecoded documents with the filter pushed down
    /// (runs in Tokio runtime)
    pub fn find_cursor(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        query: ScanQuery,
    ) -> Result<Cursor<RawDocumentBuf>> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();
        let ScanQuery { filter } = query;

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<RawDocumentBuf>(&collection);
            let filter: Document = filter.unwrap_or_default();
            let cursor = coll.find(filter).await?;
            Ok(cursor)
        })
    }

    /// Open a cursor and wrap it as a blocking, cancellable iterator.
    pub fn scan(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        query: ScanQuery,
        cancellation: CancellationToken,
    ) -> Result<DocumentCursor<'_>> {
        log::debug!("Opening cursor on {database}.{collection} with {query:?}");
        let cursor = self.find_cursor(client, database, collection, query)?;
        Ok(DocumentCursor::new(&self.runtime, cursor, cancellation))
    }
}
