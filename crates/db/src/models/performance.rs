//! Row struct for the `performances` table.

use concert_core::performance::{Applicant, Performance, Preference, StageRequirement};
use concert_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A flat row from the `performances` table.
#[derive(Debug, Clone, FromRow)]
pub struct PerformanceRow {
    pub id: DbId,
    pub genre: String,
    pub piece: String,
    pub description: String,
    pub performer_list: String,
    pub performer_description: String,
    pub remarks: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_phone: String,
    pub applicant_remarks: String,
    pub concert_availability: String,
    pub rehearsal_availability: String,
    pub preference_remarks: String,
    pub chair_count: Option<i32>,
    pub music_stand_count: Option<i32>,
    pub microphone_count: Option<i32>,
    pub provided_equipment: String,
    pub self_equipment: String,
    pub stage_remarks: String,
    pub updated_at: Timestamp,
}

impl From<PerformanceRow> for Performance {
    fn from(row: PerformanceRow) -> Self {
        Performance {
            id: row.id,
            genre: row.genre,
            piece: row.piece,
            description: row.description,
            performer_list: row.performer_list,
            performer_description: row.performer_description,
            remarks: row.remarks,
            applicant: Applicant {
                name: row.applicant_name,
                email: row.applicant_email,
                phone: row.applicant_phone,
                applicant_remarks: row.applicant_remarks,
            },
            preference: Preference {
                concert_availability: row.concert_availability,
                rehearsal_availability: row.rehearsal_availability,
                preference_remarks: row.preference_remarks,
            },
            stage_requirement: StageRequirement {
                chair_count: row.chair_count,
                music_stand_count: row.music_stand_count,
                microphone_count: row.microphone_count,
                provided_equipment: row.provided_equipment,
                self_equipment: row.self_equipment,
                stage_remarks: row.stage_remarks,
            },
            updated_at: row.updated_at,
        }
    }
}
