//! Command-line surface: argument parsing, settings merge, and dispatch.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{ConfigManager, DiagSettings, load_settings_from};
use crate::connection::{ConnectionSettings, DiagnosticSource, MongoSource};
use crate::diagnostics::{
    ProfileFields, ProfileQuery, StatsOptions, collect_stats, largest_documents, query_profile,
};
use crate::error::{Error, Result};
use crate::helpers::{database_from_uri, parse_timestamp, validate_mongodb_uri};
use crate::report::{LargestReport, OutputFormat, ProfileReport, Report};

#[derive(Parser, Debug)]
#[command(
    name = "mangodiag",
    version,
    about = "Storage, document-size and profiler diagnostics for MongoDB"
)]
pub struct Cli {
    /// Connection string (mongodb:// or mongodb+srv://)
    #[arg(long, env = "MANGODIAG_URI", global = true)]
    pub uri: Option<String>,

    /// Database to inspect (defaults to the database in the URI)
    #[arg(short, long, env = "MANGODIAG_DATABASE", global = true)]
    pub database: Option<String>,

    /// Settings file to use instead of the one in the config directory
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Connect and server selection timeout
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Storage statistics for the database and each of its collections
    Stats {
        /// Leave out system.* collections
        #[arg(long)]
        skip_system: bool,
    },
    /// The N largest documents of a collection by BSON size
    Largest {
        collection: String,
        /// How many documents to keep (at least 1)
        n: usize,
        /// Print whole documents, not just their _id
        #[arg(long)]
        full: bool,
    },
    /// Profiling-log entries in a time window whose info text matches a pattern
    Profile {
        /// Log collection, usually system.profile
        collection: String,
        /// Case-sensitive regular expression; "" matches everything
        pattern: String,
        /// Window start, ISO-8601 (UTC when no offset is given)
        start: String,
        /// Window end, ISO-8601
        end: String,
        /// Keep only the N slowest entries
        #[arg(long)]
        limit: Option<usize>,
        /// Match the pattern as plain text
        #[arg(long)]
        literal: bool,
        #[arg(long, value_name = "FIELD")]
        info_field: Option<String>,
        #[arg(long, value_name = "FIELD")]
        timestamp_field: Option<String>,
        #[arg(long, value_name = "FIELD")]
        duration_field: Option<String>,
    },
}

/// A diagnostic operation with validated parameters.
#[derive(Debug, Clone)]
pub enum Operation {
    Stats(StatsOptions),
    Largest { collection: String, top_n: usize, full: bool },
    Profile(ProfileQuery),
}

/// Everything needed to run once, resolved from flags, environment and settings.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub connection: ConnectionSettings,
    pub format: OutputFormat,
    pub operation: Operation,
}

impl Cli {
    /// Settings from `--config`, or from the config directory when present.
    pub fn load_settings(&self) -> Result<DiagSettings> {
        let loaded = match &self.config {
            Some(path) => load_settings_from(path),
            None => ConfigManager::new().and_then(|manager| manager.load_settings()),
        };
        loaded.map_err(|err| Error::Config(format!("{err:#}")))
    }

    /// Merge with settings and validate every argument. No I/O.
    pub fn resolve(&self, settings: &DiagSettings) -> Result<Invocation> {
        let uri = self.uri.clone().unwrap_or_else(|| settings.uri.clone());
        validate_mongodb_uri(&uri)?;

        let database = self
            .database
            .clone()
            .or_else(|| database_from_uri(&uri))
            .or_else(|| settings.database.clone())
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                Error::invalid("no database given (use --database or put one in the URI)")
            })?;

        let timeout_secs = self.timeout.unwrap_or(settings.connect_timeout_secs);
        if timeout_secs == 0 {
            return Err(Error::invalid("timeout must be at least 1 second"));
        }

        let operation = match &self.command {
            Command::Stats { skip_system } => {
                Operation::Stats(StatsOptions { skip_system: *skip_system })
            }
            Command::Largest { collection, n, full } => {
                if *n == 0 {
                    return Err(Error::invalid("N must be at least 1"));
                }
                if collection.trim().is_empty() {
                    return Err(Error::invalid("collection name is required"));
                }
                Operation::Largest { collection: collection.clone(), top_n: *n, full: *full }
            }
            Command::Profile {
                collection,
                pattern,
                start,
                end,
                limit,
                literal,
                info_field,
                timestamp_field,
                duration_field,
            } => {
                let defaults = &settings.profile;
                let fields = ProfileFields {
                    info: info_field.clone().unwrap_or_else(|| defaults.info.clone()),
                    timestamp: timestamp_field
                        .clone()
                        .unwrap_or_else(|| defaults.timestamp.clone()),
                    duration: duration_field.clone().unwrap_or_else(|| defaults.duration.clone()),
                };
                let query = ProfileQuery::new(
                    collection.clone(),
                    pattern.clone(),
                    parse_timestamp(start)?,
                    parse_timestamp(end)?,
                )
                .with_fields(fields)
                .with_limit(*limit)
                .literal(*literal);
                query.validate()?;
                Operation::Profile(query)
            }
        };

        Ok(Invocation {
            connection: ConnectionSettings::new(uri, database)
                .with_timeout(Duration::from_secs(timeout_secs)),
            format: self.format.unwrap_or(settings.format),
            operation,
        })
    }
}

/// Run one operation against a source and package the result as a report.
pub fn run_operation<S>(source: &S, operation: &Operation) -> Result<Report>
where
    S: DiagnosticSource + ?Sized,
{
    let database = source.database_name().to_string();
    match operation {
        Operation::Stats(options) => collect_stats(source, *options).map(Report::Stats),
        Operation::Largest { collection, top_n, full } => {
            let documents = largest_documents(source, collection, *top_n)?;
            Ok(Report::Largest(LargestReport {
                database,
                collection: collection.clone(),
                top_n: *top_n,
                documents,
                include_documents: *full,
            }))
        }
        Operation::Profile(query) => {
            let entries = query_profile(source, query)?;
            Ok(Report::Profile(ProfileReport {
                database,
                collection: query.collection.clone(),
                pattern: query.pattern.clone(),
                start: query.start,
                end: query.end,
                entries,
            }))
        }
    }
}

/// Connect, run, and release the connection. Ctrl-C cancels an in-flight scan;
/// a second Ctrl-C exits immediately.
pub fn execute(invocation: &Invocation) -> Result<Report> {
    let source = MongoSource::connect(&invocation.connection)?;

    let cancellation = source.cancellation();
    source.runtime_handle().spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, stopping");
            cancellation.cancel();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let result = run_operation(&source, &invocation.operation);
    source.close();
    result
}
