//! Repository for the `concert_slots` and `rehearsal_slots` tables.
//!
//! Both tables share a schema; the [`RundownKind`] picks the table. Every
//! read and write returns slots left-joined with their performance.

use concert_core::rundown::{EditRundownSlot, RundownKind};
use concert_core::types::DbId;
use sqlx::PgPool;

use crate::models::rundown::RundownSlotRow;

/// Column list for slot queries, over a slot relation aliased `s` joined
/// with `performances p`.
const COLUMNS: &str = "s.id, s.sort_order, s.name, s.start_time, s.event_duration, \
    s.buffer_duration, s.remarks, s.updated_at, \
    p.id AS perf_id, p.genre AS perf_genre, p.piece AS perf_piece, \
    p.applicant_name AS perf_applicant_name, p.chair_count AS perf_chair_count, \
    p.music_stand_count AS perf_music_stand_count, p.microphone_count AS perf_microphone_count, \
    p.provided_equipment AS perf_provided_equipment, p.self_equipment AS perf_self_equipment, \
    p.stage_remarks AS perf_stage_remarks";

/// Provides batch CRUD operations for rundown slots.
pub struct RundownRepo;

impl RundownRepo {
    /// Table holding slots of `kind`.
    pub fn table(kind: RundownKind) -> &'static str {
        match kind {
            RundownKind::Concert => "concert_slots",
            RundownKind::Rehearsal => "rehearsal_slots",
        }
    }

    /// List all slots by order ascending, id as tiebreak.
    pub async fn list(
        pool: &PgPool,
        kind: RundownKind,
    ) -> Result<Vec<RundownSlotRow>, sqlx::Error> {
        let table = Self::table(kind);
        let query = format!(
            "SELECT {COLUMNS}
             FROM {table} s
             LEFT JOIN performances p ON p.id = s.performance_id
             ORDER BY s.sort_order, s.id"
        );
        sqlx::query_as::<_, RundownSlotRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a slot by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        kind: RundownKind,
        id: DbId,
    ) -> Result<Option<RundownSlotRow>, sqlx::Error> {
        let table = Self::table(kind);
        let query = format!(
            "SELECT {COLUMNS}
             FROM {table} s
             LEFT JOIN performances p ON p.id = s.performance_id
             WHERE s.id = $1"
        );
        sqlx::query_as::<_, RundownSlotRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert slots in one transaction. A slot without an order is appended
    /// after the current last one.
    pub async fn create_many(
        pool: &PgPool,
        kind: RundownKind,
        inputs: &[EditRundownSlot],
    ) -> Result<Vec<RundownSlotRow>, sqlx::Error> {
        let table = Self::table(kind);
        let query = format!(
            "WITH s AS (
                INSERT INTO {table}
                    (sort_order, name, start_time, event_duration, buffer_duration,
                     remarks, performance_id)
                VALUES (
                    COALESCE($1, (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM {table})),
                    COALESCE($2, ''), $3, COALESCE($4, 'PT0S'), COALESCE($5, 'PT0S'),
                    COALESCE($6, ''), $7)
                RETURNING *
             )
             SELECT {COLUMNS}
             FROM s
             LEFT JOIN performances p ON p.id = s.performance_id"
        );

        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let row = sqlx::query_as::<_, RundownSlotRow>(&query)
                .bind(input.order)
                .bind(&input.name)
                .bind(input.start_time.flatten())
                .bind(&input.event_duration)
                .bind(&input.buffer_duration)
                .bind(&input.remarks)
                .bind(input.performance_id.flatten())
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }
        tx.commit().await?;
        Ok(created)
    }

    /// Apply partial updates in one transaction.
    ///
    /// `updated_at` moves only when a field other than the order changes,
    /// so reordering never invalidates a client's field baseline. Any update
    /// that matches no row (missing, or stale under an expected
    /// `updated_at`) fails the whole batch with [`sqlx::Error::RowNotFound`].
    pub async fn update_many(
        pool: &PgPool,
        kind: RundownKind,
        inputs: &[(DbId, EditRundownSlot)],
    ) -> Result<Vec<RundownSlotRow>, sqlx::Error> {
        let table = Self::table(kind);
        let query = format!(
            "WITH s AS (
                UPDATE {table} SET
                    sort_order = COALESCE($1, sort_order),
                    name = COALESCE($2, name),
                    start_time = CASE WHEN $3 THEN $4 ELSE start_time END,
                    event_duration = COALESCE($5, event_duration),
                    buffer_duration = COALESCE($6, buffer_duration),
                    remarks = COALESCE($7, remarks),
                    performance_id = CASE WHEN $8 THEN $9 ELSE performance_id END,
                    updated_at = CASE WHEN $10 THEN NOW() ELSE updated_at END
                WHERE id = $11
                  AND ($12::timestamptz IS NULL OR updated_at = $12)
                RETURNING *
             )
             SELECT {COLUMNS}
             FROM s
             LEFT JOIN performances p ON p.id = s.performance_id"
        );

        let mut tx = pool.begin().await?;
        let mut updated = Vec::with_capacity(inputs.len());
        for (id, input) in inputs {
            let row = sqlx::query_as::<_, RundownSlotRow>(&query)
                .bind(input.order)
                .bind(&input.name)
                .bind(input.start_time.is_some())
                .bind(input.start_time.flatten())
                .bind(&input.event_duration)
                .bind(&input.buffer_duration)
                .bind(&input.remarks)
                .bind(input.performance_id.is_some())
                .bind(input.performance_id.flatten())
                .bind(input.touches_fields())
                .bind(id)
                .bind(input.expected_updated_at)
                .fetch_one(&mut *tx)
                .await?;
            updated.push(row);
        }
        tx.commit().await?;
        Ok(updated)
    }

    /// Delete slots by id. Returns the number of rows removed.
    pub async fn delete_many(
        pool: &PgPool,
        kind: RundownKind,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let table = Self::table(kind);
        let query = format!("DELETE FROM {table} WHERE id = ANY($1)");
        let result = sqlx::query(&query).bind(ids).execute(pool).await?;
        Ok(result.rows_affected())
    }
}
