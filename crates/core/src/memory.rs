//! In-memory [`RecordStore`] for exercising the reconcilers without a
//! database.

use std::sync::Mutex;

use chrono::{TimeDelta, TimeZone, Utc};

use crate::error::CoreError;
use crate::performance::{EditPerformance, Performance};
use crate::rundown::{EditRundownSlot, RundownSlot, SlotPerformance};
use crate::store::{EditSet, Record, RecordStore};
use crate::types::{DbId, Timestamp};

/// How an edit set turns into, or changes, a stored record.
pub trait Materialize<E>: Record {
    fn materialize(id: DbId, edit: E, now: Timestamp) -> Self;

    fn apply(&mut self, edit: E, now: Timestamp);
}

struct State<R> {
    rows: Vec<R>,
    next_id: DbId,
    tick: i64,
    fail_writes: bool,
    writes: usize,
}

pub struct MemoryStore<R> {
    state: Mutex<State<R>>,
}

impl<R: Record> MemoryStore<R> {
    pub fn new(rows: Vec<R>) -> Self {
        let next_id = rows.iter().map(Record::id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(State {
                rows,
                next_id,
                tick: 0,
                fail_writes: false,
                writes: 0,
            }),
        }
    }

    pub fn rows(&self) -> Vec<R> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn get(&self, id: DbId) -> Option<R> {
        self.rows().into_iter().find(|r| r.id() == id)
    }

    /// Successful write batches so far.
    pub fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    /// Make every following write fail with a storage error.
    pub fn fail_writes(&self) {
        self.state.lock().unwrap().fail_writes = true;
    }

    /// Mutate a row behind the reconcilers' back, as a concurrent client would.
    pub fn modify(&self, id: DbId, f: impl FnOnce(&mut R)) {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.rows.iter_mut().find(|r| r.id() == id) {
            f(row);
        }
    }

    pub fn remove(&self, id: DbId) {
        self.state.lock().unwrap().rows.retain(|r| r.id() != id);
    }
}

impl<R> State<R> {
    fn now(&mut self) -> Timestamp {
        self.tick += 1;
        base_time() + TimeDelta::seconds(self.tick)
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.fail_writes {
            return Err(CoreError::Storage("connection reset".into()));
        }
        Ok(())
    }
}

/// Timestamp every in-memory row starts from.
pub fn base_time() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

impl<R, E> RecordStore<R, E> for MemoryStore<R>
where
    R: Materialize<E>,
    E: EditSet,
{
    async fn fetch_all(&self) -> Result<Vec<R>, CoreError> {
        Ok(self.rows())
    }

    async fn fetch_by_id(&self, id: DbId) -> Result<Option<R>, CoreError> {
        Ok(self.get(id))
    }

    async fn create_many(&self, edits: Vec<E>) -> Result<Vec<R>, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.check_writable()?;
        let now = state.now();
        let mut created = Vec::with_capacity(edits.len());
        for edit in edits {
            let id = state.next_id;
            state.next_id += 1;
            let row = R::materialize(id, edit, now);
            state.rows.push(row.clone());
            created.push(row);
        }
        state.writes += 1;
        Ok(created)
    }

    async fn update_many(&self, edits: Vec<(DbId, E)>) -> Result<Vec<R>, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.check_writable()?;

        // Validate the whole batch before touching any row.
        for (id, edit) in &edits {
            let Some(row) = state.rows.iter().find(|r| r.id() == *id) else {
                return Err(CoreError::Conflict(format!("{} {id} no longer exists", R::ENTITY)));
            };
            if let Some(expected) = edit.expected_updated_at() {
                if row.updated_at() != expected {
                    return Err(CoreError::Conflict(format!(
                        "{} {id} was modified concurrently",
                        R::ENTITY
                    )));
                }
            }
        }

        let now = state.now();
        let mut updated = Vec::with_capacity(edits.len());
        for (id, edit) in edits {
            if let Some(row) = state.rows.iter_mut().find(|r| r.id() == id) {
                row.apply(edit, now);
                updated.push(row.clone());
            }
        }
        state.writes += 1;
        Ok(updated)
    }

    async fn delete_many(&self, ids: &[DbId]) -> Result<u64, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.check_writable()?;
        let before = state.rows.len();
        state.rows.retain(|r| !ids.contains(&r.id()));
        state.writes += 1;
        Ok((before - state.rows.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Materialization
// ---------------------------------------------------------------------------

impl Materialize<EditPerformance> for Performance {
    fn materialize(id: DbId, edit: EditPerformance, now: Timestamp) -> Self {
        let mut performance = Performance {
            id,
            genre: String::new(),
            piece: String::new(),
            description: String::new(),
            performer_list: String::new(),
            performer_description: String::new(),
            remarks: String::new(),
            applicant: Default::default(),
            preference: Default::default(),
            stage_requirement: Default::default(),
            updated_at: now,
        };
        performance.apply(edit, now);
        performance
    }

    fn apply(&mut self, edit: EditPerformance, now: Timestamp) {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut self.genre, edit.genre);
        set(&mut self.piece, edit.piece);
        set(&mut self.description, edit.description);
        set(&mut self.performer_list, edit.performer_list);
        set(&mut self.performer_description, edit.performer_description);
        set(&mut self.remarks, edit.remarks);
        set(&mut self.applicant.name, edit.applicant.name);
        set(&mut self.applicant.email, edit.applicant.email);
        set(&mut self.applicant.phone, edit.applicant.phone);
        set(&mut self.applicant.applicant_remarks, edit.applicant.applicant_remarks);
        set(&mut self.preference.concert_availability, edit.preference.concert_availability);
        set(&mut self.preference.rehearsal_availability, edit.preference.rehearsal_availability);
        set(&mut self.preference.preference_remarks, edit.preference.preference_remarks);
        let stage = edit.stage_requirement;
        set(&mut self.stage_requirement.chair_count, stage.chair_count);
        set(&mut self.stage_requirement.music_stand_count, stage.music_stand_count);
        set(&mut self.stage_requirement.microphone_count, stage.microphone_count);
        set(&mut self.stage_requirement.provided_equipment, stage.provided_equipment);
        set(&mut self.stage_requirement.self_equipment, stage.self_equipment);
        set(&mut self.stage_requirement.stage_remarks, stage.stage_remarks);
        self.updated_at = now;
    }
}

impl Materialize<EditRundownSlot> for RundownSlot {
    fn materialize(id: DbId, edit: EditRundownSlot, now: Timestamp) -> Self {
        let mut slot = RundownSlot {
            id,
            order: 0,
            name: String::new(),
            start_time: None,
            event_duration: "PT0S".into(),
            buffer_duration: "PT0S".into(),
            remarks: String::new(),
            performance: None,
            updated_at: now,
        };
        slot.apply(edit, now);
        slot
    }

    fn apply(&mut self, edit: EditRundownSlot, now: Timestamp) {
        if edit.touches_fields() {
            self.updated_at = now;
        }
        if let Some(order) = edit.order {
            self.order = order;
        }
        if let Some(name) = edit.name {
            self.name = name;
        }
        if let Some(start_time) = edit.start_time {
            self.start_time = start_time;
        }
        if let Some(duration) = edit.event_duration {
            self.event_duration = duration;
        }
        if let Some(duration) = edit.buffer_duration {
            self.buffer_duration = duration;
        }
        if let Some(remarks) = edit.remarks {
            self.remarks = remarks;
        }
        if let Some(performance_id) = edit.performance_id {
            self.performance = performance_id.map(|id| SlotPerformance {
                id,
                genre: String::new(),
                piece: String::new(),
                applicant_name: String::new(),
                stage_requirement: Default::default(),
            });
        }
    }
}
