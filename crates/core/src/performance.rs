//! Performance records, their edit sets, and the performance column registry.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cell::{expect_count, expect_text, numeric_equals};
use crate::column::{Column, ColumnRegistry};
use crate::store::{EditSet, Record};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Stored record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub applicant_remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub concert_availability: String,
    pub rehearsal_availability: String,
    pub preference_remarks: String,
}

/// What the stage crew must set up for a performance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageRequirement {
    pub chair_count: Option<i32>,
    pub music_stand_count: Option<i32>,
    pub microphone_count: Option<i32>,
    /// Newline-separated equipment the venue provides.
    pub provided_equipment: String,
    /// Newline-separated equipment the performers bring.
    pub self_equipment: String,
    pub stage_remarks: String,
}

/// One applied performance in the concert program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub id: DbId,
    pub genre: String,
    pub piece: String,
    pub description: String,
    pub performer_list: String,
    pub performer_description: String,
    pub remarks: String,
    pub applicant: Applicant,
    pub preference: Preference,
    pub stage_requirement: StageRequirement,
    pub updated_at: Timestamp,
}

impl Record for Performance {
    const ENTITY: &'static str = "Performance";

    fn id(&self) -> DbId {
        self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

/// Entry for the performance dropdown of a rundown grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceOption {
    pub id: DbId,
    pub genre: String,
    pub piece: String,
    pub applicant_name: String,
}

impl From<&Performance> for PerformanceOption {
    fn from(p: &Performance) -> Self {
        Self {
            id: p.id,
            genre: p.genre.clone(),
            piece: p.piece.clone(),
            applicant_name: p.applicant.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Edit set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditApplicant {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub applicant_remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditPreference {
    pub concert_availability: Option<String>,
    pub rehearsal_availability: Option<String>,
    pub preference_remarks: Option<String>,
}

/// Counts use a double option: `Some(None)` clears, `None` leaves untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditStageRequirement {
    pub chair_count: Option<Option<i32>>,
    pub music_stand_count: Option<Option<i32>>,
    pub microphone_count: Option<Option<i32>>,
    pub provided_equipment: Option<String>,
    pub self_equipment: Option<String>,
    pub stage_remarks: Option<String>,
}

/// Partial performance update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditPerformance {
    pub genre: Option<String>,
    pub piece: Option<String>,
    pub description: Option<String>,
    pub performer_list: Option<String>,
    pub performer_description: Option<String>,
    pub remarks: Option<String>,
    pub applicant: EditApplicant,
    pub preference: EditPreference,
    pub stage_requirement: EditStageRequirement,
    pub expected_updated_at: Option<Timestamp>,
}

impl EditSet for EditPerformance {
    fn is_empty(&self) -> bool {
        let expected = self.expected_updated_at;
        *self
            == Self {
                expected_updated_at: expected,
                ..Self::default()
            }
    }

    fn expect_updated_at(&mut self, updated_at: Timestamp) {
        self.expected_updated_at = Some(updated_at);
    }

    fn expected_updated_at(&self) -> Option<Timestamp> {
        self.expected_updated_at
    }
}

// ---------------------------------------------------------------------------
// Column registry
// ---------------------------------------------------------------------------

macro_rules! text_column {
    ($key:literal, $($path:ident).+) => {
        Column::new(
            json!(""),
            |p: &Performance| Value::String(p.$($path).+.clone()),
            |e: &mut EditPerformance, v| {
                e.$($path).+ = Some(expect_text($key, v)?);
                Ok(())
            },
        )
    };
}

macro_rules! count_column {
    ($key:literal, $($path:ident).+) => {
        Column::new(
            Value::Null,
            |p: &Performance| json!(p.$($path).+),
            |e: &mut EditPerformance, v| {
                e.$($path).+ = Some(expect_count($key, v)?);
                Ok(())
            },
        )
        .with_equals(numeric_equals)
    };
}

/// Build the registry of editable performance columns.
pub fn performance_columns() -> ColumnRegistry<Performance, EditPerformance> {
    ColumnRegistry::new(Performance::ENTITY)
        .register(
            "id",
            Column::display_only(Value::Null, |p: &Performance| json!(p.id))
                .with_equals(numeric_equals),
        )
        .register("genre", text_column!("genre", genre))
        .register("piece", text_column!("piece", piece))
        .register("description", text_column!("description", description))
        .register("performer_list", text_column!("performer_list", performer_list))
        .register(
            "performer_description",
            text_column!("performer_description", performer_description),
        )
        .register("remarks", text_column!("remarks", remarks))
        .register("applicant.name", text_column!("applicant.name", applicant.name))
        .register("applicant.email", text_column!("applicant.email", applicant.email))
        .register("applicant.phone", text_column!("applicant.phone", applicant.phone))
        .register(
            "applicant.applicant_remarks",
            text_column!("applicant.applicant_remarks", applicant.applicant_remarks),
        )
        .register(
            "preference.concert_availability",
            text_column!("preference.concert_availability", preference.concert_availability),
        )
        .register(
            "preference.rehearsal_availability",
            text_column!(
                "preference.rehearsal_availability",
                preference.rehearsal_availability
            ),
        )
        .register(
            "preference.preference_remarks",
            text_column!("preference.preference_remarks", preference.preference_remarks),
        )
        .register(
            "stage_requirement.chair_count",
            count_column!("stage_requirement.chair_count", stage_requirement.chair_count),
        )
        .register(
            "stage_requirement.music_stand_count",
            count_column!(
                "stage_requirement.music_stand_count",
                stage_requirement.music_stand_count
            ),
        )
        .register(
            "stage_requirement.microphone_count",
            count_column!(
                "stage_requirement.microphone_count",
                stage_requirement.microphone_count
            ),
        )
        .register(
            "stage_requirement.provided_equipment",
            text_column!(
                "stage_requirement.provided_equipment",
                stage_requirement.provided_equipment
            ),
        )
        .register(
            "stage_requirement.self_equipment",
            text_column!("stage_requirement.self_equipment", stage_requirement.self_equipment),
        )
        .register(
            "stage_requirement.stage_remarks",
            text_column!("stage_requirement.stage_remarks", stage_requirement.stage_remarks),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::ChangeVerdict;
    use chrono::Utc;

    fn sample() -> Performance {
        Performance {
            id: 1,
            genre: "Rock".into(),
            piece: "Bohemian Rhapsody".into(),
            description: String::new(),
            performer_list: String::new(),
            performer_description: String::new(),
            remarks: String::new(),
            applicant: Applicant {
                name: "Mei".into(),
                email: "mei@example.com".into(),
                ..Default::default()
            },
            preference: Preference::default(),
            stage_requirement: StageRequirement {
                chair_count: Some(2),
                ..Default::default()
            },
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn nested_text_column_writes_nested_edit() {
        let columns = performance_columns();
        let mut edit = EditPerformance::default();
        let verdict = columns
            .get("applicant.email")
            .unwrap()
            .apply_on_update(
                &json!("mei@example.com"),
                &json!("mei@example.org"),
                Some(&sample()),
                &mut edit,
            )
            .unwrap();
        assert_eq!(verdict, ChangeVerdict::Accept);
        assert_eq!(edit.applicant.email.as_deref(), Some("mei@example.org"));
        assert!(!edit.is_empty());
    }

    #[test]
    fn clearing_a_count_is_a_double_none() {
        let columns = performance_columns();
        let mut edit = EditPerformance::default();
        columns
            .get("stage_requirement.chair_count")
            .unwrap()
            .apply_on_update(&json!(2), &json!(""), Some(&sample()), &mut edit)
            .unwrap();
        assert_eq!(edit.stage_requirement.chair_count, Some(None));
    }

    #[test]
    fn count_compares_numerically() {
        let columns = performance_columns();
        let verdict = columns
            .get("stage_requirement.chair_count")
            .unwrap()
            .adjudicate(&json!(2.0), &json!(3), Some(&sample()));
        assert_eq!(verdict, ChangeVerdict::Accept);
    }

    #[test]
    fn id_is_display_only() {
        let columns = performance_columns();
        assert!(columns.get("id").unwrap().is_display_only());
    }

    #[test]
    fn expected_version_alone_is_still_empty() {
        let mut edit = EditPerformance::default();
        edit.expect_updated_at(Utc::now());
        assert!(edit.is_empty());
    }

    #[test]
    fn option_uses_applicant_name() {
        let option = PerformanceOption::from(&sample());
        assert_eq!(option.applicant_name, "Mei");
        assert_eq!(option.piece, "Bohemian Rhapsody");
    }
}
