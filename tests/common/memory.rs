//! In-memory `DiagnosticSource` for tests that need no database.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use mangodiag::connection::{DiagnosticSource, DocumentStream, ScanQuery};
use mangodiag::error::{Error, Result};
use mongodb::bson::{Document, RawDocumentBuf, doc};

/// Serves documents and canned statistics from memory.
///
/// Even with `pushdown` enabled the filter is only recorded, never applied,
/// which models a provider whose server-side filter is looser than ours.
#[derive(Default)]
pub struct MemorySource {
    pub database: String,
    pub collections: BTreeMap<String, Vec<RawDocumentBuf>>,
    pub stats: BTreeMap<String, Document>,
    pub failing_stats: BTreeSet<String>,
    pub database_stats: Document,
    pub unreachable: bool,
    pub pushdown: bool,
    /// Report cancellation once this many `collStats` calls have been made.
    pub cancel_after: Option<usize>,
    pub stats_calls: Cell<usize>,
    pub cursors_opened: Cell<usize>,
    pub documents_pulled: Cell<usize>,
    pub last_query: RefCell<Option<ScanQuery>>,
}

impl MemorySource {
    pub fn new(database: &str) -> Self {
        Self {
            database: database.to_string(),
            database_stats: doc! { "db": database, "collections": 0_i32, "objects": 0_i32 },
            ..Default::default()
        }
    }

    pub fn with_collection(self, name: &str, documents: Vec<Document>) -> Self {
        let raw = documents
            .iter()
            .map(|document| RawDocumentBuf::from_document(document).expect("encodable document"))
            .collect();
        self.with_raw_collection(name, raw)
    }

    /// Serve documents byte for byte, including ones a strict decoder rejects.
    pub fn with_raw_collection(mut self, name: &str, documents: Vec<RawDocumentBuf>) -> Self {
        self.collections.insert(name.to_string(), documents);
        self
    }

    /// Register a collection with `collStats`-shaped statistics.
    pub fn with_stats(mut self, name: &str, storage_size: i64, count: i64) -> Self {
        self.collections.entry(name.to_string()).or_default();
        let data_size = storage_size * 2;
        let avg_obj_size = if count > 0 { data_size as f64 / count as f64 } else { 0.0 };
        self.stats.insert(
            name.to_string(),
            doc! {
                "ns": format!("{}.{}", self.database, name),
                "count": count,
                "size": data_size,
                "avgObjSize": avg_obj_size,
                "storageSize": storage_size,
                "totalIndexSize": 4096_i64,
                "nindexes": 1_i32,
            },
        );
        self
    }

    pub fn with_failing_stats(mut self, name: &str) -> Self {
        self.collections.entry(name.to_string()).or_default();
        self.failing_stats.insert(name.to_string());
        self
    }

    pub fn with_database_stats(mut self, stats: Document) -> Self {
        self.database_stats = stats;
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn with_pushdown(mut self) -> Self {
        self.pushdown = true;
        self
    }

    pub fn cancel_after(mut self, stats_calls: usize) -> Self {
        self.cancel_after = Some(stats_calls);
        self
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable {
            return Err(Error::Connection("connection refused".to_string()));
        }
        Ok(())
    }
}

impl DiagnosticSource for MemorySource {
    fn database_name(&self) -> &str {
        &self.database
    }

    fn collection_names(&self) -> Result<Vec<String>> {
        self.check_reachable()?;
        Ok(self.collections.keys().cloned().collect())
    }

    fn collection_stats(&self, collection: &str) -> Result<Document> {
        self.check_reachable()?;
        self.stats_calls.set(self.stats_calls.get() + 1);
        if self.failing_stats.contains(collection) {
            return Err(Error::Connection(format!("collStats rejected for {collection}")));
        }
        Ok(self.stats.get(collection).cloned().unwrap_or_else(|| doc! { "count": 0_i32 }))
    }

    fn database_stats(&self) -> Result<Document> {
        self.check_reachable()?;
        Ok(self.database_stats.clone())
    }

    fn open_cursor(&self, collection: &str, query: ScanQuery) -> Result<DocumentStream<'_>> {
        self.check_reachable()?;
        self.cursors_opened.set(self.cursors_opened.get() + 1);
        *self.last_query.borrow_mut() = Some(query);

        let documents = self.collections.get(collection).cloned().unwrap_or_default();
        Ok(Box::new(documents.into_iter().map(move |document| {
            self.documents_pulled.set(self.documents_pulled.get() + 1);
            Ok(document)
        })))
    }

    fn supports_pushdown(&self) -> bool {
        self.pushdown
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_after.is_some_and(|limit| self.stats_calls.get() >= limit)
    }
}
