//! Undecoded documents as they arrive from the server.
//!
//! Sizes are read from the received bytes, so documents that do not survive a
//! strict decode (duplicate keys, invalid UTF-8) are still measured exactly.

use mongodb::bson::{Document, RawDocument};

use crate::error::{Error, Result};

/// Length of the document as sent by the server.
pub fn raw_len(raw: &RawDocument) -> u64 {
    raw.as_bytes().len() as u64
}

/// Decode for display. Invalid UTF-8 becomes U+FFFD and a repeated key keeps
/// its last value.
pub fn decode_lossy(raw: &RawDocument) -> Result<Document> {
    mongodb::bson::from_slice_utf8_lossy(raw.as_bytes())
        .map_err(|err| Error::Parse(format!("undecodable document: {err}")))
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{RawDocumentBuf, doc};

    use super::*;

    /// `{ "s": <bytes> }` with the string bytes taken verbatim.
    fn string_document(bytes: &[u8]) -> RawDocumentBuf {
        let mut body = vec![0x02, b's', 0];
        body.extend_from_slice(&(bytes.len() as i32 + 1).to_le_bytes());
        body.extend_from_slice(bytes);
        body.push(0);
        body.push(0);

        let mut document = (body.len() as i32 + 4).to_le_bytes().to_vec();
        document.extend(body);
        RawDocumentBuf::from_bytes(document).unwrap()
    }

    #[test]
    fn raw_len_matches_bson_layout() {
        // 4 (length) + 1 (terminator)
        assert_eq!(raw_len(&RawDocumentBuf::from_document(&doc! {}).unwrap()), 5);
        // + type byte, "a\0", int32
        let one = RawDocumentBuf::from_document(&doc! { "a": 1_i32 }).unwrap();
        assert_eq!(raw_len(&one), 12);
    }

    #[test]
    fn invalid_utf8_decodes_with_replacement() {
        let raw = string_document(b"ok\xff");
        assert_eq!(raw_len(&raw), 16);

        let document = decode_lossy(&raw).unwrap();
        assert_eq!(document.get_str("s").unwrap(), "ok\u{FFFD}");
    }

    #[test]
    fn valid_documents_decode_unchanged() {
        let original = doc! { "_id": 7_i32, "tags": ["a", "b"], "nested": { "x": 1.5 } };
        let raw = RawDocumentBuf::from_document(&original).unwrap();
        assert_eq!(decode_lossy(&raw).unwrap(), original);
    }

    #[test]
    fn truncated_bytes_are_parse_errors() {
        let raw = string_document(b"abc");
        let mut bytes = raw.as_bytes().to_vec();
        // Claim a longer string than the document holds.
        bytes[7] = 0x40;
        let err = RawDocumentBuf::from_bytes(bytes)
            .map_err(|err| Error::Parse(err.to_string()))
            .and_then(|raw| decode_lossy(&raw))
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
