//! Top-N largest documents of a collection.
//!
//! Selection keeps at most N candidates in a heap whose top is the weakest
//! one, so a scan of D documents costs O(D log N) time and O(N) memory.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use mongodb::bson::Document;

use crate::bson::{decode_lossy, raw_len};
use crate::connection::{DiagnosticSource, ScanQuery};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct RankedDocument {
    pub document: Document,
    pub size_bytes: u64,
}

/// An item held while scanning. `seq` is its position in the scan.
struct Candidate<T> {
    size: u64,
    seq: u64,
    item: T,
}

// Ordered by weakness: smaller items, then later ones, compare greater,
// which puts the first one to evict at the top of the max-heap.
impl<T> Ord for Candidate<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.size.cmp(&self.size).then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<T> PartialOrd for Candidate<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Candidate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Candidate<T> {}

pub(crate) fn validate_top_n(top_n: usize) -> Result<()> {
    if top_n == 0 {
        return Err(Error::invalid("N must be at least 1"));
    }
    Ok(())
}

/// Select the `top_n` largest items by `measure`, largest first, paired with
/// their sizes.
///
/// Items of equal size keep their scan order. The first error from the
/// sequence stops the scan and is returned.
pub fn rank_largest<T, I, F>(items: I, top_n: usize, mut measure: F) -> Result<Vec<(T, u64)>>
where
    I: IntoIterator<Item = Result<T>>,
    F: FnMut(&T) -> u64,
{
    validate_top_n(top_n)?;

    let mut heap: BinaryHeap<Candidate<T>> = BinaryHeap::with_capacity(top_n);
    let mut scanned = 0u64;

    for item in items {
        let item = item?;
        let size = measure(&item);
        let seq = scanned;
        scanned += 1;

        if heap.len() < top_n {
            heap.push(Candidate { size, seq, item });
        } else if let Some(mut weakest) = heap.peek_mut()
            && size > weakest.size
        {
            *weakest = Candidate { size, seq, item };
        }
    }

    log::debug!("Ranked {scanned} documents, kept {}", heap.len());

    Ok(heap
        .into_sorted_vec()
        .into_iter()
        .map(|candidate| (candidate.item, candidate.size))
        .collect())
}

/// Scan `collection` and return its `top_n` largest documents by the size of
/// their stored BSON.
///
/// Only the kept documents are decoded, leniently, so a document with invalid
/// UTF-8 or a repeated key is still ranked and shown.
pub fn largest_documents<S>(
    source: &S,
    collection: &str,
    top_n: usize,
) -> Result<Vec<RankedDocument>>
where
    S: DiagnosticSource + ?Sized,
{
    validate_top_n(top_n)?;
    if collection.trim().is_empty() {
        return Err(Error::invalid("collection name is required"));
    }

    let cursor = source.open_cursor(collection, ScanQuery::all())?;
    rank_largest(cursor, top_n, |raw| raw_len(raw))?
        .into_iter()
        .map(|(raw, size_bytes)| Ok(RankedDocument { document: decode_lossy(&raw)?, size_bytes }))
        .collect()
}
