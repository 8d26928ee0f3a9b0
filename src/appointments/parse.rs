//! Parse-or-omit helpers for optional request fields.
//!
//! Update bodies and list filters accept malformed optional values and simply
//! leave them out instead of rejecting the request. All of that permissiveness
//! lives here.

use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, Duration,
    OffsetDateTime,
};
use tracing::debug;
use uuid::Uuid;

/// Runs `parse` on a present, non-blank value; a failed parse yields `None`.
pub fn parse_or_omit<T>(
    field: &str,
    raw: Option<&str>,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty())?;
    let parsed = parse(raw);
    if parsed.is_none() {
        debug!(field, value = raw, "dropping malformed optional field");
    }
    parsed
}

pub fn rfc3339(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}

/// `YYYY-MM-DD`, interpreted as midnight UTC.
pub fn day_start(raw: &str) -> Option<OffsetDateTime> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}

/// Inclusive end bound for a calendar day: its midnight plus 23h59m.
pub fn day_end(raw: &str) -> Option<OffsetDateTime> {
    day_start(raw).map(|start| start + Duration::hours(23) + Duration::minutes(59))
}

pub fn uuid(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}
