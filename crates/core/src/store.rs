//! Storage collaborator contract.
//!
//! The reconcilers never talk to a database directly. They read and write
//! through a [`RecordStore`], one instance per collection (the performance
//! table, the concert rundown, the rehearsal rundown). Every method is a
//! suspension point; batch writes must be atomic.

use std::future::Future;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// A stored record with a stable identity. Records serialize to the shape
/// the grid reads.
pub trait Record: Clone + Send + Sync + Serialize {
    /// Entity name used in messages (`"Performance"`, `"Rundown slot"`).
    const ENTITY: &'static str;

    fn id(&self) -> DbId;

    fn updated_at(&self) -> Timestamp;
}

/// A record that belongs to a densely ordered collection.
pub trait OrderedRecord: Record {
    fn order(&self) -> i32;
}

/// A partial update. Absent fields are left untouched by storage.
pub trait EditSet: Default + Clone + Send + Sync {
    /// `true` when no field would be written.
    fn is_empty(&self) -> bool;

    /// Make the write conditional on the row still carrying `updated_at`.
    fn expect_updated_at(&mut self, updated_at: Timestamp);

    fn expected_updated_at(&self) -> Option<Timestamp>;
}

/// An edit set for an [`OrderedRecord`].
pub trait OrderedEditSet: EditSet {
    fn set_order(&mut self, order: i32);

    /// An edit touching only the order number.
    fn order_only(order: i32) -> Self {
        let mut edit = Self::default();
        edit.set_order(order);
        edit
    }
}

/// Storage for one collection of `R`, mutated through edit sets `E`.
///
/// Failures are opaque: implementations map their transport or constraint
/// errors to [`CoreError::Storage`], or to [`CoreError::Conflict`] when a
/// conditional write finds the row changed.
pub trait RecordStore<R: Record, E: EditSet>: Send + Sync {
    /// All records. Ordered collections return them by order ascending.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<R>, CoreError>> + Send;

    fn fetch_by_id(&self, id: DbId) -> impl Future<Output = Result<Option<R>, CoreError>> + Send;

    /// Atomic batch insert, returning the created records with their ids.
    fn create_many(&self, edits: Vec<E>) -> impl Future<Output = Result<Vec<R>, CoreError>> + Send;

    /// Atomic batch update.
    fn update_many(
        &self,
        edits: Vec<(DbId, E)>,
    ) -> impl Future<Output = Result<Vec<R>, CoreError>> + Send;

    /// Atomic batch delete, returning how many rows were removed.
    fn delete_many(&self, ids: &[DbId]) -> impl Future<Output = Result<u64, CoreError>> + Send;
}
