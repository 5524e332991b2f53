//! Blocking iterator over a driver cursor.

use futures::TryStreamExt;
use mongodb::Cursor;
use mongodb::bson::RawDocumentBuf;
use tokio::runtime::Runtime;

use crate::connection::types::CancellationToken;
use crate::error::{Error, Result};

/// Pulls one undecoded document per `block_on` so a scan can stop between any two
/// documents. The underlying cursor is released as soon as the scan ends,
/// fails, is cancelled, or the iterator is dropped.
pub struct DocumentCursor<'a> {
    runtime: &'a Runtime,
    cursor: Option<Cursor<RawDocumentBuf>>,
    cancellation: CancellationToken,
}

impl<'a> DocumentCursor<'a> {
    pub fn new(
        runtime: &'a Runtime,
        cursor: Cursor<RawDocumentBuf>,
        cancellation: CancellationToken,
    ) -> Self {
        Self { runtime, cursor: Some(cursor), cancellation }
    }

    fn release(&mut self) {
        if let Some(cursor) = self.cursor.take() {
            // killCursors is spawned on drop and needs a runtime context.
            let _guard = self.runtime.enter();
            drop(cursor);
        }
    }
}

impl Iterator for DocumentCursor<'_> {
    type Item = Result<RawDocumentBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.is_none() {
            return None;
        }
        if self.cancellation.is_cancelled() {
            self.release();
            return Some(Err(Error::Cancelled));
        }

        let runtime = self.runtime;
        let cursor = self.cursor.as_mut()?;
        match runtime.block_on(cursor.try_next()) {
            Ok(Some(document)) => Some(Ok(document)),
            Ok(None) => {
                self.release();
                None
            }
            Err(err) => {
                self.release();
                Some(Err(err.into()))
            }
        }
    }
}

impl Drop for DocumentCursor<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
