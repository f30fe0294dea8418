use std::sync::Arc;

use concert_core::column::ColumnRegistry;
use concert_core::performance::{performance_columns, EditPerformance, Performance};
use concert_core::reconcile::ReconcileOptions;
use concert_core::rundown::{rundown_columns, EditRundownSlot, RundownKind, RundownSlot};
use concert_db::{PgPerformanceStore, PgRundownStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: concert_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Column registry for the performance grid.
    pub performance_columns: Arc<ColumnRegistry<Performance, EditPerformance>>,
    /// Column registry for the rundown grids.
    pub rundown_columns: Arc<ColumnRegistry<RundownSlot, EditRundownSlot>>,
}

impl AppState {
    pub fn new(pool: concert_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            performance_columns: Arc::new(performance_columns()),
            rundown_columns: Arc::new(rundown_columns()),
        }
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            conditional_writes: self.config.conditional_writes,
        }
    }

    pub fn performance_store(&self) -> PgPerformanceStore {
        PgPerformanceStore::new(self.pool.clone())
    }

    pub fn rundown_store(&self, kind: RundownKind) -> PgRundownStore {
        PgRundownStore::new(self.pool.clone(), kind)
    }
}
