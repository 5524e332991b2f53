//! Report rendering.
//!
//! `render` is a pure function of its input: the same report always renders to
//! the same bytes, in either format.

mod json;
mod table;
mod text;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diagnostics::{ProfileEntry, RankedDocument, StatsReport};

/// Output format for reports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned columns for terminals
    #[default]
    Text,
    /// Pretty-printed JSON for scripts
    Json,
}

impl OutputFormat {
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LargestReport {
    pub database: String,
    pub collection: String,
    pub top_n: usize,
    pub documents: Vec<RankedDocument>,
    /// Include whole documents rather than an `_id` summary.
    pub include_documents: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileReport {
    pub database: String,
    pub collection: String,
    pub pattern: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub entries: Vec<ProfileEntry>,
}

/// The result of one diagnostic run, with the parameters it ran with.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Stats(StatsReport),
    Largest(LargestReport),
    Profile(ProfileReport),
}

/// Render a report. Output always ends with a newline.
pub fn render(report: &Report, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
    }
}
