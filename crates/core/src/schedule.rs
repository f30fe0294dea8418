//! Forward-propagated start and end times of a rundown.

use chrono::TimeDelta;
use serde::Serialize;

use crate::duration::{format_clock, parse_iso_duration};
use crate::rundown::RundownSlot;
use crate::types::Timestamp;

/// Rendered in place of a time that has no anchor yet.
pub const UNBOUNDED: &str = "unbounded";

/// Computed timing of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeInfo {
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    /// Event plus buffer duration, in seconds.
    pub actual_duration_secs: i64,
    pub start_time_display: String,
    pub end_time_display: String,
    pub actual_duration_display: String,
}

/// A slot together with its computed timing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedSlot {
    #[serde(flatten)]
    pub slot: RundownSlot,
    pub time: TimeInfo,
}

/// Compute timing for `slots`, which must be in rundown order.
///
/// A slot starts at its own `start_time` if it has one, otherwise when the
/// previous slot ends. A slot whose durations fail to parse is logged and
/// counted as zero length; it never stops the propagation.
pub fn compute_schedule(slots: &[RundownSlot]) -> Vec<TimeInfo> {
    let mut previous_end: Option<Timestamp> = None;
    slots
        .iter()
        .map(|slot| {
            let duration = actual_duration(slot);
            let start_time = slot.start_time.or(previous_end);
            let end_time = start_time.and_then(|start| start.checked_add_signed(duration));
            previous_end = end_time;

            TimeInfo {
                start_time,
                end_time,
                actual_duration_secs: duration.num_seconds(),
                start_time_display: display_instant(start_time),
                end_time_display: display_instant(end_time),
                actual_duration_display: format_clock(duration),
            }
        })
        .collect()
}

/// Pair each slot with its timing.
pub fn timed_rundown(slots: Vec<RundownSlot>) -> Vec<TimedSlot> {
    let times = compute_schedule(&slots);
    slots
        .into_iter()
        .zip(times)
        .map(|(slot, time)| TimedSlot { slot, time })
        .collect()
}

fn actual_duration(slot: &RundownSlot) -> TimeDelta {
    let parsed = parse_iso_duration(&slot.event_duration)
        .and_then(|event| parse_iso_duration(&slot.buffer_duration).map(|buffer| (event, buffer)));
    match parsed {
        Ok((event, buffer)) => event.checked_add(&buffer).unwrap_or_else(|| {
            tracing::warn!(slot_id = slot.id, "Slot duration overflows, counting it as zero");
            TimeDelta::zero()
        }),
        Err(e) => {
            tracing::warn!(
                slot_id = slot.id,
                event_duration = %slot.event_duration,
                buffer_duration = %slot.buffer_duration,
                error = %e,
                "Invalid slot duration, counting it as zero",
            );
            TimeDelta::zero()
        }
    }
}

fn display_instant(instant: Option<Timestamp>) -> String {
    instant.map_or_else(
        || UNBOUNDED.to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}
