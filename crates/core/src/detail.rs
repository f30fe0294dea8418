//! Per-slot detail sheets: each rundown slot's time slot joined with the
//! full record of the performance it schedules.

use std::collections::HashMap;

use serde::Serialize;

use crate::performance::{Applicant, Performance, Preference};
use crate::rundown::RundownSlot;
use crate::schedule::compute_schedule;
use crate::types::DbId;

/// Where and for how long a slot sits in the rundown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlotSummary {
    pub order: i32,
    pub name: String,
    pub start_time: String,
    pub duration: String,
}

/// One slot of a detail sheet. `performance` is `None` for an empty slot
/// or one whose performance no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotDetail<T> {
    pub time_slot: TimeSlotSummary,
    pub performance: Option<T>,
}

/// Contact sheet entry for the applicant of a scheduled performance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantDetail {
    pub id: DbId,
    pub genre: String,
    pub piece: String,
    pub applicant: Applicant,
}

impl From<&Performance> for ApplicantDetail {
    fn from(p: &Performance) -> Self {
        Self {
            id: p.id,
            genre: p.genre.clone(),
            piece: p.piece.clone(),
            applicant: p.applicant.clone(),
        }
    }
}

/// Programme notes of a scheduled performance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceDetail {
    pub id: DbId,
    pub genre: String,
    pub piece: String,
    pub applicant_name: String,
    pub description: String,
    pub performer_list: String,
    pub performer_description: String,
}

impl From<&Performance> for PerformanceDetail {
    fn from(p: &Performance) -> Self {
        Self {
            id: p.id,
            genre: p.genre.clone(),
            piece: p.piece.clone(),
            applicant_name: p.applicant.name.clone(),
            description: p.description.clone(),
            performer_list: p.performer_list.clone(),
            performer_description: p.performer_description.clone(),
        }
    }
}

/// Availability an applicant gave for the concert and rehearsal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceRow {
    pub id: DbId,
    pub genre: String,
    pub applicant_name: String,
    pub preference: Preference,
}

impl From<&Performance> for PreferenceRow {
    fn from(p: &Performance) -> Self {
        Self {
            id: p.id,
            genre: p.genre.clone(),
            applicant_name: p.applicant.name.clone(),
            preference: p.preference.clone(),
        }
    }
}

/// Join `slots`, which must be in rundown order, with `performances`.
pub fn slot_details<T>(slots: &[RundownSlot], performances: &[Performance]) -> Vec<SlotDetail<T>>
where
    T: for<'a> From<&'a Performance>,
{
    let by_id: HashMap<DbId, &Performance> = performances.iter().map(|p| (p.id, p)).collect();
    let times = compute_schedule(slots);

    slots
        .iter()
        .zip(times)
        .map(|(slot, time)| SlotDetail {
            time_slot: TimeSlotSummary {
                order: slot.order,
                name: slot.name.clone(),
                start_time: time.start_time_display,
                duration: time.actual_duration_display,
            },
            performance: slot
                .performance
                .as_ref()
                .and_then(|joined| by_id.get(&joined.id).copied())
                .map(T::from),
        })
        .collect()
}
