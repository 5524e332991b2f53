//! BSON value formatting for report output.

use mongodb::bson::{Bson, Document};

const ID_PREVIEW_LEN: usize = 40;

/// Short, single-line rendering of a BSON value.
pub fn bson_value_preview(value: &Bson, max_len: usize) -> String {
    match value {
        Bson::String(s) => truncate_for_preview(s, max_len),
        Bson::Int32(n) => n.to_string(),
        Bson::Int64(n) => n.to_string(),
        Bson::Double(n) => n.to_string(),
        Bson::Boolean(b) => b.to_string(),
        Bson::Null => "null".to_string(),
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::DateTime(dt) => (*dt).try_to_rfc3339_string().unwrap_or_else(|_| format!("{dt:?}")),
        Bson::Document(doc) => format!("{{{} fields}}", doc.len()),
        Bson::Array(arr) => format!("[{} items]", arr.len()),
        other => truncate_for_preview(&other.clone().into_relaxed_extjson().to_string(), max_len),
    }
}

/// `_id` of a document for tabular output, or "-" when absent.
pub fn document_id_preview(doc: &Document) -> String {
    doc.get("_id")
        .map(|id| bson_value_preview(id, ID_PREVIEW_LEN))
        .unwrap_or_else(|| "-".to_string())
}

/// Relaxed Extended JSON, suitable for machine-readable reports.
pub fn document_to_json(doc: &Document) -> serde_json::Value {
    Bson::Document(doc.clone()).into_relaxed_extjson()
}

/// Truncate a string for preview display, adding ellipsis if needed.
pub fn truncate_for_preview(input: &str, max_len: usize) -> String {
    if input.chars().count() <= max_len {
        return input.to_string();
    }

    let mut output: String = input.chars().take(max_len.saturating_sub(3)).collect();
    output.push_str("...");
    output
}
