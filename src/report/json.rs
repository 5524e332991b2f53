// Machine-readable rendering

use serde_json::{Value, json};

use super::{LargestReport, ProfileReport, Report};
use crate::bson::{document_id_preview, document_to_json};
use crate::helpers::format_timestamp;

pub(super) fn render(report: &Report) -> String {
    let value = match report {
        Report::Stats(stats) => json!({
            "report": "stats",
            "units": { "sizes": "bytes" },
            "database": stats.database,
            "collections": stats.collections,
            "skipped": stats.skipped,
        }),
        Report::Largest(largest) => largest_value(largest),
        Report::Profile(profile) => profile_value(profile),
    };
    format!("{value:#}\n")
}

fn largest_value(report: &LargestReport) -> Value {
    let documents: Vec<Value> = report
        .documents
        .iter()
        .enumerate()
        .map(|(index, ranked)| {
            let mut entry = json!({
                "rank": index + 1,
                "sizeBytes": ranked.size_bytes,
                "id": document_id_preview(&ranked.document),
            });
            if report.include_documents {
                entry["document"] = document_to_json(&ranked.document);
            }
            entry
        })
        .collect();

    json!({
        "report": "largest",
        "units": { "sizeBytes": "bytes" },
        "database": report.database,
        "collection": report.collection,
        "topN": report.top_n,
        "documents": documents,
    })
}

fn profile_value(report: &ProfileReport) -> Value {
    let entries: Vec<Value> = report
        .entries
        .iter()
        .map(|entry| {
            let mut value = json!({
                "durationMillis": entry.duration_millis,
                "timestampUtc": format_timestamp(&entry.timestamp_utc),
                "infoText": entry.info_text,
            });
            if let Some(op) = &entry.operation {
                value["operation"] = json!(op);
            }
            if let Some(ns) = &entry.namespace {
                value["namespace"] = json!(ns);
            }
            value
        })
        .collect();

    json!({
        "report": "profile",
        "units": { "durationMillis": "milliseconds" },
        "database": report.database,
        "collection": report.collection,
        "pattern": report.pattern,
        "start": format_timestamp(&report.start),
        "end": format_timestamp(&report.end),
        "entries": entries,
    })
}
