//! Test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use mongodb::bson::{Document, RawDocumentBuf, doc};

/// Generate a batch of small, uniform documents.
pub fn generate_test_documents(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            doc! {
                "index": i as i32,
                "name": format!("Document {}", i),
                "category": if i % 2 == 0 { "even" } else { "odd" },
                "nested": { "field": format!("nested_{}", i) },
            }
        })
        .collect()
}

/// A document whose `payload` makes its encoded size grow with `len`.
pub fn padded_document(id: i32, len: usize) -> Document {
    doc! { "_id": id, "payload": "x".repeat(len) }
}

/// Encoded BSON length of a well-formed document.
pub fn bson_size(document: &Document) -> u64 {
    RawDocumentBuf::from_document(document).expect("encodable document").as_bytes().len() as u64
}

/// A document of string fields assembled byte by byte, so keys may repeat and
/// values need not be UTF-8.
pub fn raw_string_document(fields: &[(&str, &[u8])]) -> RawDocumentBuf {
    let mut body = Vec::new();
    for (key, value) in fields {
        body.push(0x02);
        body.extend_from_slice(key.as_bytes());
        body.push(0);
        body.extend_from_slice(&(value.len() as i32 + 1).to_le_bytes());
        body.extend_from_slice(value);
        body.push(0);
    }
    body.push(0);

    let mut bytes = (body.len() as i32 + 4).to_le_bytes().to_vec();
    bytes.extend(body);
    RawDocumentBuf::from_bytes(bytes).expect("length header and terminator are valid")
}

/// An instant on 2012-01-13, the day the sample profiling log covers.
pub fn jan13(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2012, 1, 13, h, m, s).unwrap()
}

pub fn bson_time(at: DateTime<Utc>) -> mongodb::bson::DateTime {
    mongodb::bson::DateTime::from_millis(at.timestamp_millis())
}

/// A profiling-log entry in the legacy shape (`info`, `millis`, `ts`).
pub fn profile_entry(info: &str, millis: i64, at: DateTime<Utc>) -> Document {
    doc! { "op": "query", "ns": "pulp.repos", "info": info, "millis": millis, "ts": bson_time(at) }
}

/// A small log spanning a few minutes around 13:22.
pub fn profile_log() -> Vec<Document> {
    vec![
        profile_entry("GET /repos/1", 120, jan13(13, 22, 30)),
        profile_entry("GET /users/2", 900, jan13(13, 22, 40)),
        profile_entry("GET /repos/2/units", 450, jan13(13, 22, 45)),
        profile_entry("GET /repos/3", 450, jan13(13, 22, 10)),
        profile_entry("GET /repos/4", 3000, jan13(13, 21, 59)),
        profile_entry("GET /repos/5", 80, jan13(13, 23, 8)),
        profile_entry("POST /Repos/6", 60, jan13(13, 22, 50)),
        doc! { "info": "GET /repos/7", "millis": 10_i32, "ts": "2012-01-13T13:22:30Z" },
        doc! { "millis": 10_i32, "ts": bson_time(jan13(13, 22, 31)) },
    ]
}
