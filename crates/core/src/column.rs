//! Column registry: what a single editable grid cell is.
//!
//! A [`Column`] binds a field key to its default value, an accessor on the
//! stored record `R`, a mutator on the partial edit set `E`, and an equality
//! predicate. A [`ColumnRegistry`] is an explicit, constructed map of those
//! columns that the reconcilers receive by reference.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::cell::strict_equals;
use crate::error::CoreError;
use crate::verdict::{self, ChangeVerdict, EqualsFn};

/// Reads a field from a stored record.
pub type GetFn<R> = fn(&R) -> Value;

/// Writes a sanitized value into an edit set, validating it first.
pub type SetFn<E> = fn(&mut E, Value) -> Result<(), CoreError>;

/// One editable (or display-only) field.
pub struct Column<R, E> {
    default: Value,
    get_stored: GetFn<R>,
    set_edit: SetFn<E>,
    equals: EqualsFn,
    display_only: bool,
}

impl<R, E> Column<R, E> {
    /// An editable column compared with JSON equality.
    pub fn new(default: Value, get_stored: GetFn<R>, set_edit: SetFn<E>) -> Self {
        Self {
            default,
            get_stored,
            set_edit,
            equals: strict_equals,
            display_only: false,
        }
    }

    /// A derived or denormalized column. It can be read for display but any
    /// proposed change to it is a no-op.
    pub fn display_only(default: Value, get_stored: GetFn<R>) -> Self {
        Self {
            default,
            get_stored,
            set_edit: |_, _| Ok(()),
            equals: strict_equals,
            display_only: true,
        }
    }

    /// Replace the comparator.
    pub fn with_equals(mut self, equals: EqualsFn) -> Self {
        self.equals = equals;
        self
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn is_display_only(&self) -> bool {
        self.display_only
    }

    /// Substitute the default for an empty cell.
    pub fn sanitize(&self, value: &Value) -> Value {
        verdict::sanitize(value, &self.default)
    }

    /// Sanitized value of this field in a stored record.
    pub fn stored_value(&self, record: &R) -> Value {
        self.sanitize(&(self.get_stored)(record))
    }

    /// Three-way adjudication without touching any edit set.
    pub fn adjudicate(&self, old: &Value, new: &Value, record: Option<&R>) -> ChangeVerdict {
        if self.display_only {
            return ChangeVerdict::Nop;
        }
        let old = self.sanitize(old);
        let new = self.sanitize(new);
        let stored = record.map(|r| self.stored_value(r));
        verdict::three_way(&old, &new, stored.as_ref(), self.equals)
    }

    /// Adjudicate an edit to an existing record and, on ACCEPT, write the
    /// sanitized new value into `edit`.
    pub fn apply_on_update(
        &self,
        old: &Value,
        new: &Value,
        record: Option<&R>,
        edit: &mut E,
    ) -> Result<ChangeVerdict, CoreError> {
        let verdict = self.adjudicate(old, new, record);
        if verdict == ChangeVerdict::Accept {
            (self.set_edit)(edit, self.sanitize(new))?;
        }
        Ok(verdict)
    }

    /// Two-way adjudication for a record being created.
    pub fn apply_on_create(
        &self,
        old: &Value,
        new: &Value,
        edit: &mut E,
    ) -> Result<ChangeVerdict, CoreError> {
        if self.display_only {
            return Ok(ChangeVerdict::Nop);
        }
        let old = self.sanitize(old);
        let new = self.sanitize(new);
        let verdict = verdict::two_way(&old, &new, self.equals);
        if verdict == ChangeVerdict::Accept {
            (self.set_edit)(edit, new)?;
        }
        Ok(verdict)
    }
}

/// Field key → [`Column`] for one record type.
pub struct ColumnRegistry<R, E> {
    entity: &'static str,
    columns: BTreeMap<&'static str, Column<R, E>>,
}

impl<R, E> ColumnRegistry<R, E> {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            columns: BTreeMap::new(),
        }
    }

    /// Register a column under `key`, replacing any previous one.
    pub fn register(mut self, key: &'static str, column: Column<R, E>) -> Self {
        self.columns.insert(key, column);
        self
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn get(&self, key: &str) -> Option<&Column<R, E>> {
        self.columns.get(key)
    }

    /// What a grid client needs to render and edit these columns.
    pub fn schema(&self) -> GridSchema {
        GridSchema {
            entity: self.entity(),
            columns: self
                .columns
                .iter()
                .map(|(key, column)| ColumnSchema {
                    key,
                    editable: !column.is_display_only(),
                    default: column.default_value().clone(),
                })
                .collect(),
        }
    }
}

/// Column layout of one grid, keyed in registry order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSchema {
    pub entity: &'static str,
    pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSchema {
    pub key: &'static str,
    pub editable: bool,
    /// Value an empty cell is read as.
    pub default: Value,
}
