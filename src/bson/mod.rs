//! BSON utilities for reading command output and summarizing documents.

mod formatter;
mod numbers;
mod raw;

pub use formatter::*;
pub use numbers::*;
pub use raw::*;
