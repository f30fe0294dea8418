//! Row struct for the `concert_slots` and `rehearsal_slots` tables.

use concert_core::performance::StageRequirement;
use concert_core::rundown::{RundownSlot, SlotPerformance};
use concert_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A slot row left-joined with its performance. The `perf_*` columns are
/// all `NULL` when the slot has no performance.
#[derive(Debug, Clone, FromRow)]
pub struct RundownSlotRow {
    pub id: DbId,
    pub sort_order: i32,
    pub name: String,
    pub start_time: Option<Timestamp>,
    pub event_duration: String,
    pub buffer_duration: String,
    pub remarks: String,
    pub updated_at: Timestamp,
    pub perf_id: Option<DbId>,
    pub perf_genre: Option<String>,
    pub perf_piece: Option<String>,
    pub perf_applicant_name: Option<String>,
    pub perf_chair_count: Option<i32>,
    pub perf_music_stand_count: Option<i32>,
    pub perf_microphone_count: Option<i32>,
    pub perf_provided_equipment: Option<String>,
    pub perf_self_equipment: Option<String>,
    pub perf_stage_remarks: Option<String>,
}

impl From<RundownSlotRow> for RundownSlot {
    fn from(row: RundownSlotRow) -> Self {
        let performance = row.perf_id.map(|id| SlotPerformance {
            id,
            genre: row.perf_genre.unwrap_or_default(),
            piece: row.perf_piece.unwrap_or_default(),
            applicant_name: row.perf_applicant_name.unwrap_or_default(),
            stage_requirement: StageRequirement {
                chair_count: row.perf_chair_count,
                music_stand_count: row.perf_music_stand_count,
                microphone_count: row.perf_microphone_count,
                provided_equipment: row.perf_provided_equipment.unwrap_or_default(),
                self_equipment: row.perf_self_equipment.unwrap_or_default(),
                stage_remarks: row.perf_stage_remarks.unwrap_or_default(),
            },
        });

        RundownSlot {
            id: row.id,
            order: row.sort_order,
            name: row.name,
            start_time: row.start_time,
            event_duration: row.event_duration,
            buffer_duration: row.buffer_duration,
            remarks: row.remarks,
            performance,
            updated_at: row.updated_at,
        }
    }
}
