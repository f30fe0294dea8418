//! PostgreSQL-backed [`RecordStore`] implementations.
//!
//! Thin adapters from the repositories to the core storage contract. sqlx
//! errors are logged here and handed to the core as opaque
//! [`CoreError::Storage`] messages; a batch update that matched no row
//! becomes [`CoreError::Conflict`].

use concert_core::error::CoreError;
use concert_core::performance::{EditPerformance, Performance};
use concert_core::rundown::{EditRundownSlot, RundownKind, RundownSlot};
use concert_core::store::{Record, RecordStore};
use concert_core::types::DbId;

use crate::repositories::{PerformanceRepo, RundownRepo};
use crate::DbPool;

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn storage_error(entity: &'static str, operation: &'static str, err: sqlx::Error) -> CoreError {
    tracing::error!(entity, operation, error = %err, "Storage operation failed");
    CoreError::Storage(format!("{operation} failed: {err}"))
}

fn update_error(entity: &'static str, err: sqlx::Error) -> CoreError {
    match err {
        sqlx::Error::RowNotFound => {
            tracing::info!(entity, "Conditional update matched no row");
            CoreError::Conflict(format!(
                "{entity} has changed or been deleted since last fetch"
            ))
        }
        other => storage_error(entity, "update", other),
    }
}

// ---------------------------------------------------------------------------
// Performances
// ---------------------------------------------------------------------------

/// The `performances` table.
#[derive(Clone)]
pub struct PgPerformanceStore {
    pool: DbPool,
}

impl PgPerformanceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl RecordStore<Performance, EditPerformance> for PgPerformanceStore {
    async fn fetch_all(&self) -> Result<Vec<Performance>, CoreError> {
        let rows = PerformanceRepo::list(&self.pool)
            .await
            .map_err(|e| storage_error(Performance::ENTITY, "fetch", e))?;
        Ok(rows.into_iter().map(Performance::from).collect())
    }

    async fn fetch_by_id(&self, id: DbId) -> Result<Option<Performance>, CoreError> {
        let row = PerformanceRepo::find_by_id(&self.pool, id)
            .await
            .map_err(|e| storage_error(Performance::ENTITY, "fetch", e))?;
        Ok(row.map(Performance::from))
    }

    async fn create_many(
        &self,
        edits: Vec<EditPerformance>,
    ) -> Result<Vec<Performance>, CoreError> {
        let rows = PerformanceRepo::create_many(&self.pool, &edits)
            .await
            .map_err(|e| storage_error(Performance::ENTITY, "create", e))?;
        Ok(rows.into_iter().map(Performance::from).collect())
    }

    async fn update_many(
        &self,
        edits: Vec<(DbId, EditPerformance)>,
    ) -> Result<Vec<Performance>, CoreError> {
        let rows = PerformanceRepo::update_many(&self.pool, &edits)
            .await
            .map_err(|e| update_error(Performance::ENTITY, e))?;
        Ok(rows.into_iter().map(Performance::from).collect())
    }

    async fn delete_many(&self, ids: &[DbId]) -> Result<u64, CoreError> {
        PerformanceRepo::delete_many(&self.pool, ids)
            .await
            .map_err(|e| storage_error(Performance::ENTITY, "delete", e))
    }
}

// ---------------------------------------------------------------------------
// Rundown slots
// ---------------------------------------------------------------------------

/// One rundown table, chosen by kind.
#[derive(Clone)]
pub struct PgRundownStore {
    pool: DbPool,
    kind: RundownKind,
}

impl PgRundownStore {
    pub fn new(pool: DbPool, kind: RundownKind) -> Self {
        Self { pool, kind }
    }
}

impl RecordStore<RundownSlot, EditRundownSlot> for PgRundownStore {
    async fn fetch_all(&self) -> Result<Vec<RundownSlot>, CoreError> {
        let rows = RundownRepo::list(&self.pool, self.kind)
            .await
            .map_err(|e| storage_error(RundownSlot::ENTITY, "fetch", e))?;
        Ok(rows.into_iter().map(RundownSlot::from).collect())
    }

    async fn fetch_by_id(&self, id: DbId) -> Result<Option<RundownSlot>, CoreError> {
        let row = RundownRepo::find_by_id(&self.pool, self.kind, id)
            .await
            .map_err(|e| storage_error(RundownSlot::ENTITY, "fetch", e))?;
        Ok(row.map(RundownSlot::from))
    }

    async fn create_many(
        &self,
        edits: Vec<EditRundownSlot>,
    ) -> Result<Vec<RundownSlot>, CoreError> {
        let rows = RundownRepo::create_many(&self.pool, self.kind, &edits)
            .await
            .map_err(|e| storage_error(RundownSlot::ENTITY, "create", e))?;
        Ok(rows.into_iter().map(RundownSlot::from).collect())
    }

    async fn update_many(
        &self,
        edits: Vec<(DbId, EditRundownSlot)>,
    ) -> Result<Vec<RundownSlot>, CoreError> {
        let rows = RundownRepo::update_many(&self.pool, self.kind, &edits)
            .await
            .map_err(|e| update_error(RundownSlot::ENTITY, e))?;
        Ok(rows.into_iter().map(RundownSlot::from).collect())
    }

    async fn delete_many(&self, ids: &[DbId]) -> Result<u64, CoreError> {
        RundownRepo::delete_many(&self.pool, self.kind, ids)
            .await
            .map_err(|e| storage_error(RundownSlot::ENTITY, "delete", e))
    }
}
