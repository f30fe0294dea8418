//! Stage changeover actions between consecutive rundown slots.

use serde::Serialize;

use crate::performance::StageRequirement;
use crate::rundown::{RundownSlot, SlotPerformance};
use crate::schedule::compute_schedule;

/// One line of the stage crew's sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRequirementRow {
    pub order: i32,
    pub name: String,
    pub start_time: String,
    pub duration: String,
    /// Changeover instructions, one `- item` / `+ item` per line.
    pub stage_actions: String,
    pub performance: Option<SlotPerformance>,
}

/// What the crew removes and adds before each slot.
///
/// Each slot is compared with the previous slot's stage requirement; the
/// first slot is compared with an empty stage, and so is any slot without
/// a performance. Removals come first, then additions.
pub fn compute_stage_actions(slots: &[RundownSlot]) -> Vec<String> {
    let empty = StageRequirement::default();
    let mut previous = &empty;
    slots
        .iter()
        .map(|slot| {
            let current = requirement_of(slot, &empty);
            let actions = changeover(previous, current);
            previous = current;
            actions
        })
        .collect()
}

/// The stage crew view of a rundown, which must be in rundown order.
pub fn stage_requirement_view(slots: Vec<RundownSlot>) -> Vec<StageRequirementRow> {
    let times = compute_schedule(&slots);
    let actions = compute_stage_actions(&slots);
    slots
        .into_iter()
        .zip(times)
        .zip(actions)
        .map(|((slot, time), stage_actions)| StageRequirementRow {
            order: slot.order,
            name: slot.name,
            start_time: time.start_time_display,
            duration: time.actual_duration_display,
            stage_actions,
            performance: slot.performance,
        })
        .collect()
}

fn requirement_of<'a>(slot: &'a RundownSlot, empty: &'a StageRequirement) -> &'a StageRequirement {
    slot.performance
        .as_ref()
        .map_or(empty, |p| &p.stage_requirement)
}

fn changeover(previous: &StageRequirement, current: &StageRequirement) -> String {
    let mut minus = Vec::new();
    let mut plus = Vec::new();

    for (label, before, after) in [
        ("chairs", previous.chair_count, current.chair_count),
        ("music stands", previous.music_stand_count, current.music_stand_count),
        ("microphones", previous.microphone_count, current.microphone_count),
    ] {
        let before = before.unwrap_or(0);
        let after = after.unwrap_or(0);
        if after > before {
            plus.push(format!("{} {label}", after - before));
        } else if before > after {
            minus.push(format!("{} {label}", before - after));
        }
    }

    for (before, after) in [
        (&previous.provided_equipment, &current.provided_equipment),
        (&previous.self_equipment, &current.self_equipment),
    ] {
        let before = equipment_items(before);
        let after = equipment_items(after);
        plus.extend(after.iter().filter(|item| !before.contains(*item)).map(|s| s.to_string()));
        minus.extend(before.iter().filter(|item| !after.contains(*item)).map(|s| s.to_string()));
    }

    minus
        .iter()
        .map(|item| format!("- {item}"))
        .chain(plus.iter().map(|item| format!("+ {item}")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn equipment_items(list: &str) -> Vec<&str> {
    list.lines()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}
