// Human-readable rendering

use std::fmt::{self, Write as _};

use super::table::{Column, render_table};
use super::{LargestReport, ProfileReport, Report};
use crate::bson::{document_id_preview, document_to_json};
use crate::diagnostics::StatsReport;
use crate::helpers::{
    format_avg_bytes, format_bytes, format_millis, format_number, format_size_human,
    format_timestamp,
};

pub(super) fn render(report: &Report) -> String {
    let mut out = String::new();
    let written = match report {
        Report::Stats(stats) => render_stats(stats, &mut out),
        Report::Largest(largest) => render_largest(largest, &mut out),
        Report::Profile(profile) => render_profile(profile, &mut out),
    };
    // Writing into a String cannot fail.
    debug_assert!(written.is_ok());
    out
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 { format!("1 {one}") } else { format!("{} {many}", format_number(count as u64)) }
}

fn render_stats(report: &StatsReport, out: &mut String) -> fmt::Result {
    let db = &report.database;
    writeln!(out, "database: {}", db.name)?;
    writeln!(out, "  collections:   {}", format_number(db.collection_count))?;
    writeln!(out, "  documents:     {}", format_number(db.document_count))?;
    writeln!(out, "  avg doc size:  {}", format_avg_bytes(db.average_document_size))?;
    writeln!(
        out,
        "  data size:     {} ({})",
        format_bytes(db.data_size),
        format_size_human(db.data_size)
    )?;
    writeln!(
        out,
        "  storage size:  {} ({})",
        format_bytes(db.storage_size),
        format_size_human(db.storage_size)
    )?;
    writeln!(
        out,
        "  index size:    {} ({}, {})",
        format_bytes(db.total_index_size),
        format_size_human(db.total_index_size),
        plural(db.index_count as usize, "index", "indexes")
    )?;
    out.push('\n');

    if report.collections.is_empty() {
        out.push_str("no collections\n");
    } else {
        let columns = [
            Column::left("COLLECTION"),
            Column::right("DOCUMENTS"),
            Column::right("AVG SIZE"),
            Column::right("DATA SIZE"),
            Column::right("STORAGE SIZE"),
            Column::right("INDEX SIZE"),
        ];
        let rows: Vec<Vec<String>> = report
            .collections
            .iter()
            .map(|c| {
                let name = if c.capped { format!("{} (capped)", c.name) } else { c.name.clone() };
                vec![
                    name,
                    format_number(c.document_count),
                    format_avg_bytes(c.average_document_size),
                    format_bytes(c.data_size),
                    format_bytes(c.storage_size),
                    format_bytes(c.total_index_size),
                ]
            })
            .collect();
        render_table(&columns, &rows, out);
    }

    for skipped in &report.skipped {
        writeln!(out, "skipped: {} ({})", skipped.name, skipped.reason)?;
    }
    Ok(())
}

fn render_largest(report: &LargestReport, out: &mut String) -> fmt::Result {
    writeln!(
        out,
        "largest documents in {}.{}: {} (requested {})",
        report.database,
        report.collection,
        plural(report.documents.len(), "document", "documents"),
        report.top_n
    )?;

    if report.documents.is_empty() {
        out.push_str("collection is empty\n");
        return Ok(());
    }

    out.push('\n');
    let columns = [Column::right("RANK"), Column::right("SIZE"), Column::left("_ID")];
    let rows: Vec<Vec<String>> = report
        .documents
        .iter()
        .enumerate()
        .map(|(index, ranked)| {
            vec![
                (index + 1).to_string(),
                format_bytes(ranked.size_bytes),
                document_id_preview(&ranked.document),
            ]
        })
        .collect();
    render_table(&columns, &rows, out);

    if report.include_documents {
        for (index, ranked) in report.documents.iter().enumerate() {
            writeln!(out, "\n#{} {}", index + 1, document_to_json(&ranked.document))?;
        }
    }
    Ok(())
}

fn render_profile(report: &ProfileReport, out: &mut String) -> fmt::Result {
    writeln!(
        out,
        "profile entries in {}.{} matching {:?} from {} to {}: {}",
        report.database,
        report.collection,
        report.pattern,
        format_timestamp(&report.start),
        format_timestamp(&report.end),
        plural(report.entries.len(), "entry", "entries")
    )?;

    if report.entries.is_empty() {
        out.push_str("no matching entries\n");
        return Ok(());
    }

    out.push('\n');
    let columns = [
        Column::right("DURATION"),
        Column::left("TIMESTAMP"),
        Column::left("OP"),
        Column::left("INFO"),
    ];
    let rows: Vec<Vec<String>> = report
        .entries
        .iter()
        .map(|entry| {
            vec![
                format_millis(entry.duration_millis),
                format_timestamp(&entry.timestamp_utc),
                entry.operation.clone().unwrap_or_else(|| "-".to_string()),
                entry.info_text.replace('\n', " "),
            ]
        })
        .collect();
    render_table(&columns, &rows, out);
    Ok(())
}
