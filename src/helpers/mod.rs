pub mod format;
pub mod time;
pub mod validate;

pub use format::{format_avg_bytes, format_bytes, format_millis, format_number, format_size_human};
pub use time::{format_timestamp, parse_timestamp};
pub use validate::{
    REDACTED_PASSWORD, database_from_uri, redact_uri_password, validate_mongodb_uri,
};
