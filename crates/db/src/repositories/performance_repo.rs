//! Repository for the `performances` table.

use concert_core::performance::EditPerformance;
use concert_core::types::DbId;
use sqlx::PgPool;

use crate::models::performance::PerformanceRow;

/// Column list for performances queries.
const COLUMNS: &str = "id, genre, piece, description, performer_list, performer_description, \
    remarks, applicant_name, applicant_email, applicant_phone, applicant_remarks, \
    concert_availability, rehearsal_availability, preference_remarks, \
    chair_count, music_stand_count, microphone_count, \
    provided_equipment, self_equipment, stage_remarks, updated_at";

/// Provides batch CRUD operations for performances.
pub struct PerformanceRepo;

impl PerformanceRepo {
    /// List all performances by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<PerformanceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM performances ORDER BY id");
        sqlx::query_as::<_, PerformanceRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a performance by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PerformanceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM performances WHERE id = $1");
        sqlx::query_as::<_, PerformanceRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert performances in one transaction. Absent fields take the
    /// column defaults.
    pub async fn create_many(
        pool: &PgPool,
        inputs: &[EditPerformance],
    ) -> Result<Vec<PerformanceRow>, sqlx::Error> {
        let query = format!(
            "INSERT INTO performances
                (genre, piece, description, performer_list, performer_description, remarks,
                 applicant_name, applicant_email, applicant_phone, applicant_remarks,
                 concert_availability, rehearsal_availability, preference_remarks,
                 chair_count, music_stand_count, microphone_count,
                 provided_equipment, self_equipment, stage_remarks)
             VALUES (COALESCE($1, ''), COALESCE($2, ''), COALESCE($3, ''), COALESCE($4, ''),
                     COALESCE($5, ''), COALESCE($6, ''), COALESCE($7, ''), COALESCE($8, ''),
                     COALESCE($9, ''), COALESCE($10, ''), COALESCE($11, ''), COALESCE($12, ''),
                     COALESCE($13, ''), $14, $15, $16,
                     COALESCE($17, ''), COALESCE($18, ''), COALESCE($19, ''))
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let stage = &input.stage_requirement;
            let row = sqlx::query_as::<_, PerformanceRow>(&query)
                .bind(&input.genre)
                .bind(&input.piece)
                .bind(&input.description)
                .bind(&input.performer_list)
                .bind(&input.performer_description)
                .bind(&input.remarks)
                .bind(&input.applicant.name)
                .bind(&input.applicant.email)
                .bind(&input.applicant.phone)
                .bind(&input.applicant.applicant_remarks)
                .bind(&input.preference.concert_availability)
                .bind(&input.preference.rehearsal_availability)
                .bind(&input.preference.preference_remarks)
                .bind(stage.chair_count.flatten())
                .bind(stage.music_stand_count.flatten())
                .bind(stage.microphone_count.flatten())
                .bind(&stage.provided_equipment)
                .bind(&stage.self_equipment)
                .bind(&stage.stage_remarks)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }
        tx.commit().await?;
        Ok(created)
    }

    /// Apply partial updates in one transaction.
    ///
    /// Text fields use `COALESCE`; nullable counts carry a "present" flag so
    /// that clearing to `NULL` differs from leaving untouched. An update with
    /// an expected `updated_at` only matches a row that still carries it.
    /// Any update that matches no row fails the whole batch with
    /// [`sqlx::Error::RowNotFound`].
    pub async fn update_many(
        pool: &PgPool,
        inputs: &[(DbId, EditPerformance)],
    ) -> Result<Vec<PerformanceRow>, sqlx::Error> {
        let query = format!(
            "UPDATE performances SET
                genre = COALESCE($1, genre),
                piece = COALESCE($2, piece),
                description = COALESCE($3, description),
                performer_list = COALESCE($4, performer_list),
                performer_description = COALESCE($5, performer_description),
                remarks = COALESCE($6, remarks),
                applicant_name = COALESCE($7, applicant_name),
                applicant_email = COALESCE($8, applicant_email),
                applicant_phone = COALESCE($9, applicant_phone),
                applicant_remarks = COALESCE($10, applicant_remarks),
                concert_availability = COALESCE($11, concert_availability),
                rehearsal_availability = COALESCE($12, rehearsal_availability),
                preference_remarks = COALESCE($13, preference_remarks),
                chair_count = CASE WHEN $14 THEN $15 ELSE chair_count END,
                music_stand_count = CASE WHEN $16 THEN $17 ELSE music_stand_count END,
                microphone_count = CASE WHEN $18 THEN $19 ELSE microphone_count END,
                provided_equipment = COALESCE($20, provided_equipment),
                self_equipment = COALESCE($21, self_equipment),
                stage_remarks = COALESCE($22, stage_remarks),
                updated_at = NOW()
             WHERE id = $23
               AND ($24::timestamptz IS NULL OR updated_at = $24)
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut updated = Vec::with_capacity(inputs.len());
        for (id, input) in inputs {
            let stage = &input.stage_requirement;
            let row = sqlx::query_as::<_, PerformanceRow>(&query)
                .bind(&input.genre)
                .bind(&input.piece)
                .bind(&input.description)
                .bind(&input.performer_list)
                .bind(&input.performer_description)
                .bind(&input.remarks)
                .bind(&input.applicant.name)
                .bind(&input.applicant.email)
                .bind(&input.applicant.phone)
                .bind(&input.applicant.applicant_remarks)
                .bind(&input.preference.concert_availability)
                .bind(&input.preference.rehearsal_availability)
                .bind(&input.preference.preference_remarks)
                .bind(stage.chair_count.is_some())
                .bind(stage.chair_count.flatten())
                .bind(stage.music_stand_count.is_some())
                .bind(stage.music_stand_count.flatten())
                .bind(stage.microphone_count.is_some())
                .bind(stage.microphone_count.flatten())
                .bind(&stage.provided_equipment)
                .bind(&stage.self_equipment)
                .bind(&stage.stage_remarks)
                .bind(id)
                .bind(input.expected_updated_at)
                .fetch_one(&mut *tx)
                .await?;
            updated.push(row);
        }
        tx.commit().await?;
        Ok(updated)
    }

    /// Delete performances by id. Returns the number of rows removed.
    pub async fn delete_many(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM performances WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
