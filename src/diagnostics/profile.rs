//! Profiling-log search by time window and text pattern.

use chrono::{DateTime, Utc};
use mongodb::bson::{Bson, Document, doc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::bson::{bson_to_u64, decode_lossy};
use crate::connection::{DiagnosticSource, ScanQuery};
use crate::error::{Error, Result};

/// Collection the server writes profiler output to.
pub const DEFAULT_PROFILE_COLLECTION: &str = "system.profile";

/// Names of the profiling-log fields a query reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileFields {
    pub info: String,
    pub timestamp: String,
    pub duration: String,
}

impl Default for ProfileFields {
    fn default() -> Self {
        Self {
            info: "info".to_string(),
            timestamp: "ts".to_string(),
            duration: "millis".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ProfileQuery {
    pub collection: String,
    /// Case-sensitive regular expression; empty matches everything.
    pub pattern: String,
    /// Match `pattern` as plain text instead of a regular expression.
    pub literal: bool,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub fields: ProfileFields,
    /// Keep only the N slowest matches.
    pub limit: Option<usize>,
}

impl ProfileQuery {
    pub fn new(
        collection: impl Into<String>,
        pattern: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            collection: collection.into(),
            pattern: pattern.into(),
            literal: false,
            start,
            end,
            fields: ProfileFields::default(),
            limit: None,
        }
    }

    pub fn with_fields(mut self, fields: ProfileFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn literal(mut self, literal: bool) -> Self {
        self.literal = literal;
        self
    }

    /// The expression actually matched, after literal escaping.
    fn expression(&self) -> String {
        if self.literal { regex::escape(&self.pattern) } else { self.pattern.clone() }
    }

    /// Check the arguments and compile the pattern. No I/O.
    pub fn validate(&self) -> Result<Regex> {
        if self.collection.trim().is_empty() {
            return Err(Error::invalid("collection name is required"));
        }
        if self.start >= self.end {
            return Err(Error::invalid(format!(
                "start ({}) must be before end ({})",
                self.start.to_rfc3339(),
                self.end.to_rfc3339()
            )));
        }
        if self.limit == Some(0) {
            return Err(Error::invalid("limit must be at least 1"));
        }
        for (label, field) in [
            ("info", &self.fields.info),
            ("timestamp", &self.fields.timestamp),
            ("duration", &self.fields.duration),
        ] {
            if field.is_empty() {
                return Err(Error::invalid(format!("{label} field name must not be empty")));
            }
        }
        Regex::new(&self.expression())
            .map_err(|err| Error::invalid(format!("invalid pattern '{}': {err}", self.pattern)))
    }

    /// Server-side prefilter: the exact time window and a string info field.
    ///
    /// The server reads `$regex` as PCRE, which disagrees with `regex` on
    /// Unicode classes and set operations, so only an escaped literal pattern
    /// is pushed; any other pattern is matched locally.
    pub fn pushdown(&self) -> ScanQuery {
        let mut filter = Document::new();
        filter.insert(
            self.fields.timestamp.clone(),
            doc! {
                "$gte": mongodb::bson::DateTime::from_millis(self.start.timestamp_millis()),
                "$lte": mongodb::bson::DateTime::from_millis(self.end.timestamp_millis()),
            },
        );
        if self.literal && !self.pattern.is_empty() {
            filter.insert(self.fields.info.clone(), doc! { "$regex": self.expression() });
        } else {
            filter.insert(self.fields.info.clone(), doc! { "$type": "string" });
        }

        ScanQuery { filter: Some(filter) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    pub info_text: String,
    pub timestamp_utc: DateTime<Utc>,
    pub duration_millis: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ProfileEntry {
    /// Read an entry from a log document. Entries without a string info field
    /// or a date timestamp yield `None`; a missing duration reads as zero.
    pub fn from_document(doc: &Document, fields: &ProfileFields) -> Option<Self> {
        let info_text = doc.get_str(&fields.info).ok()?.to_string();
        let timestamp_utc = match doc.get(&fields.timestamp)? {
            Bson::DateTime(dt) => DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())?,
            _ => return None,
        };
        let duration_millis = doc.get(&fields.duration).and_then(bson_to_u64).unwrap_or(0);

        Some(Self {
            info_text,
            timestamp_utc,
            duration_millis,
            operation: doc.get_str("op").ok().map(str::to_string),
            namespace: doc.get_str("ns").ok().map(str::to_string),
        })
    }
}

/// Find log entries inside `[start, end]` whose info text matches the pattern,
/// slowest first (ties: earliest first).
///
/// The filter is pushed to the source when it supports it and is always
/// re-applied locally, so the result holds for any source.
pub fn query_profile<S>(source: &S, query: &ProfileQuery) -> Result<Vec<ProfileEntry>>
where
    S: DiagnosticSource + ?Sized,
{
    let matcher = query.validate()?;

    let scan = if source.supports_pushdown() {
        let pushdown = query.pushdown();
        log::debug!("Profile filter pushed down: {:?}", pushdown.filter);
        pushdown
    } else {
        log::debug!("Source cannot filter; scanning {} in full", query.collection);
        ScanQuery::all()
    };

    let mut scanned = 0usize;
    let mut entries = Vec::new();
    for document in source.open_cursor(&query.collection, scan)? {
        let raw = document?;
        scanned += 1;

        let document = match decode_lossy(&raw) {
            Ok(document) => document,
            Err(err) => {
                log::warn!("Skipping unreadable profile entry: {err}");
                continue;
            }
        };

        let Some(entry) = ProfileEntry::from_document(&document, &query.fields) else {
            continue;
        };
        if entry.timestamp_utc < query.start || entry.timestamp_utc > query.end {
            continue;
        }
        if !matcher.is_match(&entry.info_text) {
            continue;
        }
        entries.push(entry);
    }

    entries.sort_by(|a, b| {
        b.duration_millis
            .cmp(&a.duration_millis)
            .then_with(|| a.timestamp_utc.cmp(&b.timestamp_utc))
    });
    if let Some(limit) = query.limit {
        entries.truncate(limit);
    }

    log::info!("{} of {scanned} profile entries matched", entries.len());
    Ok(entries)
}
