//! ISO-8601 duration handling for rundown slot lengths.
//!
//! Slots store `event_duration` and `buffer_duration` as ISO-8601 duration
//! text (`PT10M`, `PT1H30M`, `P1DT2H`). Only fixed-length units are
//! accepted: weeks, days, hours, minutes and (fractional) seconds. Years
//! and months depend on a calendar anchor and are rejected.

use std::sync::LazyLock;

use chrono::TimeDelta;
use regex::Regex;

use crate::error::CoreError;

/// Pattern for `PnWnDTnHnMnS` with every component optional.
pub const DURATION_PATTERN: &str =
    r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:[.,]\d+)?)S)?)?$";

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DURATION_PATTERN).expect("valid regex"));

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
const MILLIS_PER_WEEK: i64 = 7 * MILLIS_PER_DAY;

/// Parse an ISO-8601 duration into a [`TimeDelta`].
///
/// The error string explains why the input was refused and is suitable for
/// logs and validation messages.
pub fn parse_iso_duration(text: &str) -> Result<TimeDelta, String> {
    let Some(caps) = DURATION_RE.captures(text) else {
        let reason = if has_calendar_units(text) {
            "calendar units (years, months) are not supported"
        } else {
            "expected the form PnWnDTnHnMnS"
        };
        return Err(format!("invalid ISO-8601 duration '{text}': {reason}"));
    };

    if caps.iter().skip(1).all(|m| m.is_none()) || text.ends_with('T') {
        return Err(format!(
            "invalid ISO-8601 duration '{text}': at least one component is required"
        ));
    }

    let overflow = || format!("invalid ISO-8601 duration '{text}': value out of range");

    let mut total: i64 = 0;
    for (idx, unit) in [
        (1, MILLIS_PER_WEEK),
        (2, MILLIS_PER_DAY),
        (3, MILLIS_PER_HOUR),
        (4, MILLIS_PER_MINUTE),
    ] {
        if let Some(m) = caps.get(idx) {
            let value: i64 = m.as_str().parse().map_err(|_| overflow())?;
            total = value
                .checked_mul(unit)
                .and_then(|ms| total.checked_add(ms))
                .ok_or_else(overflow)?;
        }
    }

    if let Some(m) = caps.get(5) {
        let seconds: f64 = m.as_str().replace(',', ".").parse().map_err(|_| overflow())?;
        let millis = (seconds * MILLIS_PER_SECOND as f64).round();
        if !millis.is_finite() || millis > i64::MAX as f64 {
            return Err(overflow());
        }
        total = total.checked_add(millis as i64).ok_or_else(overflow)?;
    }

    TimeDelta::try_milliseconds(total).ok_or_else(overflow)
}

/// Validate a duration string, mapping failure to [`CoreError::Validation`].
pub fn validate_iso_duration(field: &str, text: &str) -> Result<(), CoreError> {
    parse_iso_duration(text)
        .map(|_| ())
        .map_err(|e| CoreError::Validation(format!("{field}: {e}")))
}

/// Format a duration as `hh:mm:ss`. Hours are not wrapped at 24.
pub fn format_clock(duration: TimeDelta) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
}

fn has_calendar_units(text: &str) -> bool {
    let date_part = text.split('T').next().unwrap_or(text);
    date_part.starts_with('P') && (date_part.contains('Y') || date_part.contains('M'))
}
