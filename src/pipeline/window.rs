//! Recent-activity window and note timestamp parsing

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// Lower bound of the recent-activity filter, fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
}

impl TimeWindow {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self { start }
    }

    /// Window covering `days` before `now`
    pub fn lookback_from(now: DateTime<Utc>, days: u32) -> Self {
        Self::starting_at(now - Duration::days(i64::from(days)))
    }

    /// Window covering the last `days`, anchored at the current instant
    pub fn last_days(days: u32) -> Self {
        Self::lookback_from(Utc::now(), days)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// No upper bound: anything at or after the start is inside
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start
    }
}

/// Parse an ISO-8601 timestamp and normalize it to UTC
///
/// Offsets (including `Z`) are honoured. A date-time without an offset is
/// taken as UTC, and a bare date as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    let rfc3339 = DateTime::parse_from_rfc3339(raw);
    if let Ok(parsed) = rfc3339 {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    rfc3339.map(|parsed| parsed.with_timezone(&Utc))
}
