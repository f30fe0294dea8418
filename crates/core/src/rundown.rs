//! Rundown slots: the ordered time slots of a concert or rehearsal.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cell::{
    duration_equals, expect_duration, expect_id, expect_instant, expect_text, instant_equals,
    instant_value, numeric_equals,
};
use crate::column::{Column, ColumnRegistry};
use crate::performance::StageRequirement;
use crate::store::{EditSet, OrderedEditSet, OrderedRecord, Record};
use crate::types::{DbId, Timestamp};

/// Which rundown collection a slot belongs to. Each kind has its own dense
/// `1..N` ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RundownKind {
    Concert,
    Rehearsal,
}

impl RundownKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RundownKind::Concert => "concert",
            RundownKind::Rehearsal => "rehearsal",
        }
    }
}

impl fmt::Display for RundownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The performance a slot references, joined for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPerformance {
    pub id: DbId,
    pub genre: String,
    pub piece: String,
    pub applicant_name: String,
    pub stage_requirement: StageRequirement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RundownSlot {
    pub id: DbId,
    pub order: i32,
    pub name: String,
    /// Explicit anchor. Slots without one start when the previous slot ends.
    pub start_time: Option<Timestamp>,
    /// ISO-8601 duration text.
    pub event_duration: String,
    /// ISO-8601 duration text.
    pub buffer_duration: String,
    pub remarks: String,
    pub performance: Option<SlotPerformance>,
    pub updated_at: Timestamp,
}

impl Record for RundownSlot {
    const ENTITY: &'static str = "Rundown slot";

    fn id(&self) -> DbId {
        self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

impl OrderedRecord for RundownSlot {
    fn order(&self) -> i32 {
        self.order
    }
}

/// Partial rundown slot update. Nullable fields use a double option.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditRundownSlot {
    pub order: Option<i32>,
    pub name: Option<String>,
    pub start_time: Option<Option<Timestamp>>,
    pub event_duration: Option<String>,
    pub buffer_duration: Option<String>,
    pub remarks: Option<String>,
    pub performance_id: Option<Option<DbId>>,
    pub expected_updated_at: Option<Timestamp>,
}

impl EditRundownSlot {
    /// Whether any field other than the order number is written.
    pub fn touches_fields(&self) -> bool {
        self.name.is_some()
            || self.start_time.is_some()
            || self.event_duration.is_some()
            || self.buffer_duration.is_some()
            || self.remarks.is_some()
            || self.performance_id.is_some()
    }
}

impl EditSet for EditRundownSlot {
    fn is_empty(&self) -> bool {
        self.order.is_none() && !self.touches_fields()
    }

    fn expect_updated_at(&mut self, updated_at: Timestamp) {
        self.expected_updated_at = Some(updated_at);
    }

    fn expected_updated_at(&self) -> Option<Timestamp> {
        self.expected_updated_at
    }
}

impl OrderedEditSet for EditRundownSlot {
    fn set_order(&mut self, order: i32) {
        self.order = Some(order);
    }
}

// ---------------------------------------------------------------------------
// Column registry
// ---------------------------------------------------------------------------

/// Build the registry of rundown grid columns.
///
/// `id`, `order` and the joined performance details are display-only; order
/// changes go through reordering and the performance is chosen by id.
pub fn rundown_columns() -> ColumnRegistry<RundownSlot, EditRundownSlot> {
    ColumnRegistry::new(RundownSlot::ENTITY)
        .register(
            "id",
            Column::display_only(Value::Null, |s: &RundownSlot| json!(s.id))
                .with_equals(numeric_equals),
        )
        .register(
            "order",
            Column::display_only(Value::Null, |s: &RundownSlot| json!(s.order))
                .with_equals(numeric_equals),
        )
        .register(
            "name",
            Column::new(
                json!(""),
                |s: &RundownSlot| Value::String(s.name.clone()),
                |e: &mut EditRundownSlot, v| {
                    e.name = Some(expect_text("name", v)?);
                    Ok(())
                },
            ),
        )
        .register(
            "start_time",
            Column::new(
                Value::Null,
                |s: &RundownSlot| instant_value(s.start_time),
                |e: &mut EditRundownSlot, v| {
                    e.start_time = Some(expect_instant("start_time", v)?);
                    Ok(())
                },
            )
            .with_equals(instant_equals),
        )
        .register(
            "event_duration",
            Column::new(
                Value::Null,
                |s: &RundownSlot| Value::String(s.event_duration.clone()),
                |e: &mut EditRundownSlot, v| {
                    e.event_duration = Some(expect_duration("event_duration", v)?);
                    Ok(())
                },
            )
            .with_equals(duration_equals),
        )
        .register(
            "buffer_duration",
            Column::new(
                Value::Null,
                |s: &RundownSlot| Value::String(s.buffer_duration.clone()),
                |e: &mut EditRundownSlot, v| {
                    e.buffer_duration = Some(expect_duration("buffer_duration", v)?);
                    Ok(())
                },
            )
            .with_equals(duration_equals),
        )
        .register(
            "remarks",
            Column::new(
                json!(""),
                |s: &RundownSlot| Value::String(s.remarks.clone()),
                |e: &mut EditRundownSlot, v| {
                    e.remarks = Some(expect_text("remarks", v)?);
                    Ok(())
                },
            ),
        )
        .register(
            "performance.id",
            Column::new(
                Value::Null,
                |s: &RundownSlot| s.performance.as_ref().map_or(Value::Null, |p| json!(p.id)),
                |e: &mut EditRundownSlot, v| {
                    e.performance_id = Some(expect_id("performance.id", v)?);
                    Ok(())
                },
            )
            .with_equals(numeric_equals),
        )
        .register(
            "performance.genre",
            Column::display_only(json!(""), |s: &RundownSlot| {
                s.performance.as_ref().map_or(Value::Null, |p| json!(p.genre))
            }),
        )
        .register(
            "performance.piece",
            Column::display_only(json!(""), |s: &RundownSlot| {
                s.performance.as_ref().map_or(Value::Null, |p| json!(p.piece))
            }),
        )
        .register(
            "performance.applicant_name",
            Column::display_only(json!(""), |s: &RundownSlot| {
                s.performance
                    .as_ref()
                    .map_or(Value::Null, |p| json!(p.applicant_name))
            }),
        )
}

// ---------------------------------------------------------------------------
// Duplicate performance references
// ---------------------------------------------------------------------------

/// A performance referenced by more than one slot of the same rundown.
///
/// This is a soft constraint: duplicates are reported, never prevented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateReference {
    pub performance_id: DbId,
    /// Referencing slots, in rundown order.
    pub slot_ids: Vec<DbId>,
}

/// Find performances referenced by more than one slot.
pub fn find_duplicate_performance_references(slots: &[RundownSlot]) -> Vec<DuplicateReference> {
    let mut ordered: Vec<&RundownSlot> = slots.iter().collect();
    ordered.sort_by_key(|s| (s.order, s.id));

    let mut by_performance: BTreeMap<DbId, Vec<DbId>> = BTreeMap::new();
    for slot in ordered {
        if let Some(p) = &slot.performance {
            by_performance.entry(p.id).or_default().push(slot.id);
        }
    }

    by_performance
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(performance_id, slot_ids)| DuplicateReference {
            performance_id,
            slot_ids,
        })
        .collect()
}
