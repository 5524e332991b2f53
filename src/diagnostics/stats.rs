//! Storage statistics for a database and each of its collections.

use mongodb::bson::Document;
use serde::Serialize;

use crate::bson::{read_f64, read_u64};
use crate::connection::DiagnosticSource;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStat {
    pub name: String,
    pub document_count: u64,
    pub average_document_size: f64,
    pub data_size: u64,
    pub storage_size: u64,
    pub total_index_size: u64,
    pub index_count: u64,
    pub capped: bool,
}

impl CollectionStat {
    /// Read the fields of a `collStats` reply.
    pub fn from_document(name: &str, doc: &Document) -> Self {
        Self {
            name: name.to_string(),
            document_count: read_u64(doc, "count"),
            average_document_size: read_f64(doc, "avgObjSize"),
            data_size: read_u64(doc, "size"),
            storage_size: read_u64(doc, "storageSize"),
            total_index_size: read_u64(doc, "totalIndexSize"),
            index_count: read_u64(doc, "nindexes"),
            capped: doc.get_bool("capped").unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStat {
    pub name: String,
    pub collection_count: u64,
    pub document_count: u64,
    pub average_document_size: f64,
    pub data_size: u64,
    pub storage_size: u64,
    pub total_index_size: u64,
    pub index_count: u64,
}

impl DatabaseStat {
    /// Read the fields of a `dbStats` reply.
    pub fn from_document(name: &str, doc: &Document) -> Self {
        Self {
            name: name.to_string(),
            collection_count: read_u64(doc, "collections"),
            document_count: read_u64(doc, "objects"),
            average_document_size: read_f64(doc, "avgObjSize"),
            data_size: read_u64(doc, "dataSize"),
            storage_size: read_u64(doc, "storageSize"),
            total_index_size: read_u64(doc, "indexSize"),
            index_count: read_u64(doc, "indexes"),
        }
    }
}

/// A collection left out of the report because its statistics failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCollection {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub database: DatabaseStat,
    /// Largest storage first, ties by name.
    pub collections: Vec<CollectionStat>,
    pub skipped: Vec<SkippedCollection>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StatsOptions {
    /// Leave out `system.*` collections.
    pub skip_system: bool,
}

/// Gather database and collection statistics.
///
/// Listing collections and reading database statistics must succeed; a
/// collection whose statistics fail is recorded in `skipped` and the rest of
/// the report is still produced. Cancellation is checked before each
/// collection and ends the run with `Cancelled`.
pub fn collect_stats<S>(source: &S, options: StatsOptions) -> Result<StatsReport>
where
    S: DiagnosticSource + ?Sized,
{
    let database_name = source.database_name().to_string();

    let mut names = source.collection_names()?;
    if options.skip_system {
        names.retain(|name| !name.starts_with("system."));
    }
    log::debug!("Collecting stats for {} collections in {database_name}", names.len());

    let database = DatabaseStat::from_document(&database_name, &source.database_stats()?);

    let mut collections = Vec::with_capacity(names.len());
    let mut skipped = Vec::new();
    for name in names {
        if source.is_cancelled() {
            log::info!("Stopped after {} collections", collections.len() + skipped.len());
            return Err(Error::Cancelled);
        }
        match source.collection_stats(&name) {
            Ok(doc) => collections.push(CollectionStat::from_document(&name, &doc)),
            Err(Error::Cancelled) => return Err(Error::Cancelled),
            Err(err) => {
                let partial =
                    Error::PartialStats { collection: name.clone(), reason: err.to_string() };
                log::warn!("{partial}");
                skipped.push(SkippedCollection { name, reason: err.to_string() });
            }
        }
    }

    collections
        .sort_by(|a, b| b.storage_size.cmp(&a.storage_size).then_with(|| a.name.cmp(&b.name)));
    skipped.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(StatsReport { database, collections, skipped })
}
