//! Driver operations split into focused modules.

pub mod documents;
pub mod stats;
