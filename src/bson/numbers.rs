//! Lenient numeric reads from server command output.
//!
//! `collStats`/`dbStats` report sizes as Int32, Int64, or Double depending on
//! magnitude and server version, so every read accepts all three.

use mongodb::bson::{Bson, Document};

pub fn read_u64(doc: &Document, key: &str) -> u64 {
    read_u64_opt(doc, key).unwrap_or(0)
}

pub fn read_u64_opt(doc: &Document, key: &str) -> Option<u64> {
    doc.get(key).and_then(bson_to_u64)
}

pub fn read_f64(doc: &Document, key: &str) -> f64 {
    doc.get(key).and_then(bson_to_f64).unwrap_or(0.0)
}

/// Non-negative integer value; negatives and non-numbers are `None`.
pub fn bson_to_u64(value: &Bson) -> Option<u64> {
    match value {
        Bson::Int32(v) => u64::try_from(*v).ok(),
        Bson::Int64(v) => u64::try_from(*v).ok(),
        Bson::Double(v) => {
            if v.is_finite() && *v >= 0.0 {
                Some(*v as u64)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Non-negative finite value; negatives and non-numbers are `None`.
pub fn bson_to_f64(value: &Bson) -> Option<f64> {
    let value = match value {
        Bson::Int32(v) => f64::from(*v),
        Bson::Int64(v) => *v as f64,
        Bson::Double(v) => *v,
        _ => return None,
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}
