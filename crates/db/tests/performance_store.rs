//! Integration tests for the performance repository and store.
//!
//! `#[sqlx::test]` provisions a fresh migrated database per test from `DATABASE_URL`.

use assert_matches::assert_matches;
use concert_core::error::CoreError;
use concert_core::performance::EditPerformance;
use concert_core::store::RecordStore;
use concert_db::repositories::PerformanceRepo;
use concert_db::PgPerformanceStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_performance(genre: &str, chairs: Option<i32>) -> EditPerformance {
    let mut edit = EditPerformance {
        genre: Some(genre.to_string()),
        piece: Some("Clair de Lune".to_string()),
        ..Default::default()
    };
    edit.applicant.name = Some("Noor".to_string());
    edit.stage_requirement.chair_count = Some(chairs);
    edit
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_fills_defaults(pool: PgPool) {
    let rows = PerformanceRepo::create_many(&pool, &[new_performance("Classical", Some(1))])
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].genre, "Classical");
    assert_eq!(rows[0].applicant_name, "Noor");
    assert_eq!(rows[0].description, "");
    assert_eq!(rows[0].chair_count, Some(1));
    assert_eq!(rows[0].music_stand_count, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_leaves_absent_fields_untouched(pool: PgPool) {
    let store = PgPerformanceStore::new(pool.clone());
    let created = store
        .create_many(vec![new_performance("Classical", Some(2))])
        .await
        .unwrap();
    let id = created[0].id;

    let edit = EditPerformance {
        genre: Some("Jazz".to_string()),
        ..Default::default()
    };
    store.update_many(vec![(id, edit)]).await.unwrap();

    let stored = store.fetch_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.genre, "Jazz");
    assert_eq!(stored.piece, "Clair de Lune");
    assert_eq!(stored.stage_requirement.chair_count, Some(2));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_can_clear_a_count(pool: PgPool) {
    let store = PgPerformanceStore::new(pool.clone());
    let id = store
        .create_many(vec![new_performance("Pop", Some(4))])
        .await
        .unwrap()[0]
        .id;

    let mut edit = EditPerformance::default();
    edit.stage_requirement.chair_count = Some(None);
    store.update_many(vec![(id, edit)]).await.unwrap();

    let stored = store.fetch_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.stage_requirement.chair_count, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stale_conditional_update_conflicts(pool: PgPool) {
    let store = PgPerformanceStore::new(pool.clone());
    let created = store
        .create_many(vec![new_performance("Rock", None)])
        .await
        .unwrap();
    let id = created[0].id;
    let read_at = created[0].updated_at;

    // Someone else writes first.
    let other = EditPerformance {
        remarks: Some("moved".to_string()),
        ..Default::default()
    };
    store.update_many(vec![(id, other)]).await.unwrap();

    let edit = EditPerformance {
        genre: Some("Jazz".to_string()),
        expected_updated_at: Some(read_at - chrono::TimeDelta::seconds(1)),
        ..Default::default()
    };
    let result = store.update_many(vec![(id, edit)]).await;

    assert_matches!(result, Err(CoreError::Conflict(_)));
    let stored = store.fetch_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.genre, "Rock");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_update_is_atomic(pool: PgPool) {
    let store = PgPerformanceStore::new(pool.clone());
    let id = store
        .create_many(vec![new_performance("Rock", None)])
        .await
        .unwrap()[0]
        .id;

    let good = EditPerformance {
        genre: Some("Jazz".to_string()),
        ..Default::default()
    };
    let missing = EditPerformance {
        genre: Some("Folk".to_string()),
        ..Default::default()
    };
    let result = store
        .update_many(vec![(id, good), (id + 1000, missing)])
        .await;

    assert_matches!(result, Err(CoreError::Conflict(_)));
    let stored = store.fetch_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.genre, "Rock");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_count_violates_check(pool: PgPool) {
    let result = PerformanceRepo::create_many(&pool, &[new_performance("Rock", Some(-1))]).await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_counts_removed_rows(pool: PgPool) {
    let store = PgPerformanceStore::new(pool.clone());
    let id = store
        .create_many(vec![new_performance("Rock", None)])
        .await
        .unwrap()[0]
        .id;

    assert_eq!(store.delete_many(&[id]).await.unwrap(), 1);
    assert_eq!(store.delete_many(&[id]).await.unwrap(), 0);
}
