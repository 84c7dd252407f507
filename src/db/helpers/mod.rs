use anyhow::{anyhow, Result};
use chrono::{NaiveDateTime, Utc};
use log::warn;

/// Storage timestamp format shared with the external recorder. Values must
/// round-trip through this format exactly.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub fn parse_timestamp(value: &str, field: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|err| anyhow!("failed to parse {field} '{value}': {err}"))
}

/// Lenient variant for sample rows: a malformed stored timestamp must not
/// abort the run, so it falls back to the current wall-clock time. The
/// substitution is logged because it skews that record's place on the
/// timeline.
pub fn parse_timestamp_or_now(value: &str, field: &str) -> NaiveDateTime {
    match NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("{field} '{value}' is not a valid timestamp, substituting current time: {err}");
            Utc::now().naive_utc()
        }
    }
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}
