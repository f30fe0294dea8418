//! Record and ordering reconciliation usecases.
//!
//! A [`Reconciler`] ties one storage collection to its column registry and
//! turns grid actions into storage writes:
//!
//! - create: two-way check per field, then one insert
//! - update: re-read the stored record, three-way check per field, then one
//!   partial update holding only the accepted fields
//! - delete: unconditional
//! - reorder (ordered collections only): normalize, three-way check the
//!   whole id sequence, then one atomic batch of order writes
//!
//! Each action reports an [`ActionResult`]; a batch applies actions one by
//! one so a rejected action never blocks the ones after it.

use crate::action::{ActionResult, BatchResult, DataAction, FieldChange};
use crate::column::ColumnRegistry;
use crate::error::CoreError;
use crate::ordering::{self, OrderingChange, OrderingVerdict};
use crate::store::{EditSet, OrderedEditSet, OrderedRecord, Record, RecordStore};
use crate::types::DbId;
use crate::verdict::ChangeVerdict;

/// Behaviour switches for reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Make field updates conditional on the row's `updated_at` being the
    /// one read during adjudication. Closes the read-decide-write race at
    /// the cost of rejecting whole updates when any field of the row moved.
    pub conditional_writes: bool,
}

pub struct Reconciler<'a, S, R, E> {
    store: &'a S,
    columns: &'a ColumnRegistry<R, E>,
    options: ReconcileOptions,
}

impl<'a, S, R, E> Reconciler<'a, S, R, E>
where
    R: Record,
    E: EditSet,
    S: RecordStore<R, E>,
{
    pub fn new(store: &'a S, columns: &'a ColumnRegistry<R, E>, options: ReconcileOptions) -> Self {
        Self {
            store,
            columns,
            options,
        }
    }

    /// Create a record from grid changes.
    pub async fn create(&self, changes: &[FieldChange]) -> ActionResult {
        let edit = match self.build_create_edit(changes) {
            Ok(edit) => edit,
            Err(result) => return result,
        };
        match self.insert(edit).await {
            Ok(record) => created(&record, ActionResult::succeeded),
            Err(e) => ActionResult::failed(format!("Create {} failed: {e}", R::ENTITY)),
        }
    }

    /// Apply field changes to the record `id`.
    ///
    /// Fields are reconciled independently: accepted ones are written even
    /// when others are rejected, and the result names the rejected keys.
    pub async fn update(&self, id: DbId, changes: &[FieldChange]) -> ActionResult {
        let record = match self.store.fetch_by_id(id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                return ActionResult::failed(format!("{} {id} no longer exists.", R::ENTITY))
            }
            Err(e) => {
                return ActionResult::not_processed(format!(
                    "Failed to fetch {} {id}: {e}",
                    R::ENTITY
                ))
            }
        };

        let mut edit = E::default();
        let mut rejected: Vec<&str> = Vec::new();
        for change in changes {
            let Some(column) = self.columns.get(&change.key) else {
                return unexpected_key(&change.key);
            };
            let verdict = column.apply_on_update(
                &change.old_value,
                &change.new_value,
                Some(&record),
                &mut edit,
            );
            match verdict {
                Ok(ChangeVerdict::Reject) => rejected.push(change.key.as_str()),
                Ok(ChangeVerdict::Accept | ChangeVerdict::Nop) => {}
                Err(e) => return invalid_change(&change.key, e),
            }
        }

        let wrote = !edit.is_empty();
        if wrote {
            if self.options.conditional_writes {
                edit.expect_updated_at(record.updated_at());
            }
            if let Err(e) = self.store.update_many(vec![(id, edit)]).await {
                return ActionResult::failed(format!("Update {} {id} failed: {e}", R::ENTITY));
            }
        }

        if rejected.is_empty() {
            let message = if wrote {
                format!("Updated {} {id}.", R::ENTITY)
            } else {
                "No changes.".to_string()
            };
            return ActionResult::succeeded(message);
        }

        tracing::info!(
            entity = R::ENTITY,
            id,
            fields = ?rejected,
            "Rejected stale field edits",
        );
        ActionResult::failed(format!(
            "{} {id}: {} changed by someone else since last fetch.",
            R::ENTITY,
            rejected.join(", ")
        ))
    }

    /// Delete the record `id`. Last delete wins; deleting a missing record
    /// succeeds.
    pub async fn delete(&self, id: DbId) -> ActionResult {
        match self.store.delete_many(&[id]).await {
            Ok(0) => ActionResult::succeeded(format!("{} {id} was already deleted.", R::ENTITY)),
            Ok(_) => ActionResult::succeeded(format!("Deleted {} {id}.", R::ENTITY)),
            Err(e) => ActionResult::failed(format!("Delete {} {id} failed: {e}", R::ENTITY)),
        }
    }

    /// Apply one action to an unordered collection.
    pub async fn apply(&self, action: DataAction) -> ActionResult {
        match action {
            DataAction::Create { changes, .. } => self.create(&changes).await,
            DataAction::Update { id, changes } => self.update(id, &changes).await,
            DataAction::Delete { id } => self.delete(id).await,
            DataAction::Reorder { .. } => ActionResult::not_processed(format!(
                "{} records cannot be reordered.",
                R::ENTITY
            )),
        }
    }

    pub async fn apply_batch(&self, actions: Vec<DataAction>) -> BatchResult {
        let mut results = Vec::with_capacity(actions.len());
        for action in actions {
            results.push(self.apply(action).await);
        }
        BatchResult::from_results(results)
    }

    fn build_create_edit(&self, changes: &[FieldChange]) -> Result<E, ActionResult> {
        let mut edit = E::default();
        for change in changes {
            let Some(column) = self.columns.get(&change.key) else {
                return Err(unexpected_key(&change.key));
            };
            column
                .apply_on_create(&change.old_value, &change.new_value, &mut edit)
                .map_err(|e| invalid_change(&change.key, e))?;
        }
        Ok(edit)
    }

    async fn insert(&self, edit: E) -> Result<R, CoreError> {
        let mut created = self.store.create_many(vec![edit]).await?;
        created
            .pop()
            .ok_or_else(|| CoreError::Internal("storage returned no created record".into()))
    }
}

impl<'a, S, R, E> Reconciler<'a, S, R, E>
where
    R: OrderedRecord,
    E: OrderedEditSet,
    S: RecordStore<R, E>,
{
    /// The canonical id sequence, repairing non-dense order numbers in
    /// storage first.
    pub async fn canonical_ordering(&self) -> Result<Vec<DbId>, CoreError> {
        let records = self.store.fetch_all().await?;
        if !ordering::is_dense(&records) {
            let repairs = ordering::normalization_assignments(&records);
            tracing::warn!(
                entity = R::ENTITY,
                repaired = repairs.len(),
                "Normalizing non-dense order numbers",
            );
            self.write_orders(repairs).await?;
        }
        Ok(ordering::canonical_ids(&records))
    }

    /// Reconcile a client's proposed reordering against the canonical one.
    pub async fn reorder(&self, change: &OrderingChange) -> ActionResult {
        let canonical = match self.canonical_ordering().await {
            Ok(canonical) => canonical,
            Err(e) => {
                return ActionResult::not_processed(format!("Failed to fetch ordering: {e}"))
            }
        };

        match ordering::adjudicate_ordering(change, &canonical) {
            OrderingVerdict::Nop => ActionResult::succeeded("No changes."),
            OrderingVerdict::Reject => {
                tracing::info!(entity = R::ENTITY, "Rejected stale reorder");
                ActionResult::failed("Ordering has changed since last fetch.")
            }
            OrderingVerdict::Malformed => ActionResult::failed(
                "Proposed ordering is not a permutation of the current ordering.",
            ),
            OrderingVerdict::Accept(new_ordering) => {
                match self.write_orders(ordering::order_assignments(&new_ordering)).await {
                    Ok(()) => ActionResult::succeeded(format!(
                        "Reordered {} {} record(s).",
                        new_ordering.len(),
                        R::ENTITY
                    )),
                    Err(e) => ActionResult::failed(format!("Reorder failed: {e}")),
                }
            }
        }
    }

    /// Create a record at the end of the collection, then optionally move
    /// it to `insertion_index` of the proposed ordering.
    ///
    /// The proposal was made before the new id existed; the created id is
    /// spliced in (see [`ordering::splice_created_id`]) before the reorder is
    /// reconciled. If that reorder is rejected the record stays appended.
    pub async fn create_ordered(
        &self,
        changes: &[FieldChange],
        placement: Option<(OrderingChange, usize)>,
    ) -> ActionResult {
        let mut edit = match self.build_create_edit(changes) {
            Ok(edit) => edit,
            Err(result) => return result,
        };

        let count = match self.canonical_ordering().await {
            Ok(canonical) => canonical.len(),
            Err(e) => {
                return ActionResult::not_processed(format!("Failed to fetch ordering: {e}"))
            }
        };
        let Ok(next_order) = i32::try_from(count + 1) else {
            return ActionResult::not_processed("Collection is too large to append to.");
        };
        edit.set_order(next_order);

        let record = match self.insert(edit).await {
            Ok(record) => record,
            Err(e) => return ActionResult::failed(format!("Create {} failed: {e}", R::ENTITY)),
        };

        let Some((mut change, insertion_index)) = placement else {
            return created(&record, ActionResult::succeeded);
        };

        ordering::splice_created_id(&mut change, record.id(), insertion_index);
        let reordered = self.reorder(&change).await;

        // The reorder moved the new record; report where it ended up.
        let record = match self.store.fetch_by_id(record.id()).await {
            Ok(Some(current)) => current,
            _ => record,
        };
        if reordered.success {
            created(&record, ActionResult::succeeded)
        } else {
            let message = format!(
                "Created {} {} but reorder on create failed: {}",
                R::ENTITY,
                record.id(),
                reordered.message
            );
            created(&record, |_| ActionResult::failed(message))
        }
    }

    /// Apply one action to an ordered collection.
    pub async fn apply_ordered(&self, action: DataAction) -> ActionResult {
        match action {
            DataAction::Create {
                changes,
                ordering,
                insertion_index,
            } => {
                let placement = ordering.map(|change| {
                    let index = insertion_index.unwrap_or(change.new_ordering.len());
                    (change, index)
                });
                self.create_ordered(&changes, placement).await
            }
            DataAction::Update { id, changes } => self.update(id, &changes).await,
            DataAction::Delete { id } => self.delete(id).await,
            DataAction::Reorder {
                old_ordering,
                new_ordering,
            } => {
                self.reorder(&OrderingChange {
                    old_ordering,
                    new_ordering,
                })
                .await
            }
        }
    }

    pub async fn apply_ordered_batch(&self, actions: Vec<DataAction>) -> BatchResult {
        let mut results = Vec::with_capacity(actions.len());
        for action in actions {
            results.push(self.apply_ordered(action).await);
        }
        BatchResult::from_results(results)
    }

    async fn write_orders(&self, assignments: Vec<(DbId, i32)>) -> Result<(), CoreError> {
        if assignments.is_empty() {
            return Ok(());
        }
        let edits = assignments
            .into_iter()
            .map(|(id, order)| (id, E::order_only(order)))
            .collect();
        self.store.update_many(edits).await.map(|_| ())
    }
}

/// Result of a create, carrying the stored record.
fn created<R: Record>(record: &R, result: impl FnOnce(String) -> ActionResult) -> ActionResult {
    let result = result(format!("Created {} {}.", R::ENTITY, record.id()));
    match serde_json::to_value(record) {
        Ok(value) => result.with_record(value),
        Err(e) => {
            tracing::warn!(
                entity = R::ENTITY,
                id = record.id(),
                error = %e,
                "Failed to serialize created record",
            );
            result
        }
    }
}

fn unexpected_key(key: &str) -> ActionResult {
    ActionResult::not_processed(format!("Unexpected key: {key}"))
}

fn invalid_change(key: &str, error: CoreError) -> ActionResult {
    tracing::warn!(key, error = %error, "Failed to apply change");
    ActionResult::not_processed(format!("Failed to apply change to {key}: {error}"))
}
