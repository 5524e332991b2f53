//! Database and collection statistics commands.

use mongodb::Client;
use mongodb::bson::{Document, doc};

use crate::connection::ConnectionManager;
use crate::error::Result;

impl ConnectionManager {
    /// Run `collStats` for one collection, sizes in bytes (runs in Tokio runtime)
    pub fn collection_stats(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
    ) -> Result<Document> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();
        self.runtime.block_on(async {
            let db = client.database(&database);
            let stats = db.run_command(doc! { "collStats": collection, "scale": 1 }).await?;
            Ok(stats)
        })
    }

    /// Run `dbStats` for the whole database, sizes in bytes (runs in Tokio runtime)
    pub fn database_stats(&self, client: &Client, database: &str) -> Result<Document> {
        let client = client.clone();
        let database = database.to_string();
        self.runtime.block_on(async {
            let db = client.database(&database);
            let stats = db.run_command(doc! { "dbStats": 1, "scale": 1 }).await?;
            Ok(stats)
        })
    }
}
