//! Integration tests for batch soft-delete, restore, and permanent delete.
//!
//! Batch operations are single statements (`id = ANY($1)`), so they are
//! atomic as a unit; empty input must short-circuit without ever touching
//! storage.

use sitecraft_db::models::project_image::{CreateProjectImage, ImageListFilter};
use sitecraft_db::repositories::ProjectImageRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_image(hash: &str) -> CreateProjectImage {
    CreateProjectImage {
        app_id: "app-1".to_string(),
        user_id: "user-1".to_string(),
        file_path: format!("uploads/app-1/{hash}.jpg"),
        original_name: "photo.jpg".to_string(),
        mime_type: "image/jpeg".to_string(),
        size_bytes: 4096,
        content_hash: hash.to_string(),
        width: None,
        height: None,
        format: Some("jpeg".to_string()),
        is_optimized: None,
        original_size_bytes: None,
        compression_ratio: None,
        is_background_image: None,
    }
}

// ---------------------------------------------------------------------------
// Test: batch soft delete marks all given rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_soft_delete_marks_all(pool: PgPool) {
    let a = ProjectImageRepo::create(&pool, &new_image("b1")).await.unwrap();
    let b = ProjectImageRepo::create(&pool, &new_image("b2")).await.unwrap();
    let keep = ProjectImageRepo::create(&pool, &new_image("b3")).await.unwrap();

    let marked = ProjectImageRepo::batch_soft_delete(&pool, &[a.id, b.id], "user-9")
        .await
        .unwrap();
    assert_eq!(marked, 2);

    let active = ProjectImageRepo::list_by_app(&pool, "app-1", &ImageListFilter::default())
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, keep.id);

    let trashed = ProjectImageRepo::find_by_id_include_deleted(&pool, a.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(trashed.deleted_by.as_deref(), Some("user-9"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_soft_delete_counts_only_newly_marked(pool: PgPool) {
    let a = ProjectImageRepo::create(&pool, &new_image("c1")).await.unwrap();
    let b = ProjectImageRepo::create(&pool, &new_image("c2")).await.unwrap();
    ProjectImageRepo::soft_delete(&pool, a.id, "user-1").await.unwrap();

    let marked = ProjectImageRepo::batch_soft_delete(&pool, &[a.id, b.id], "user-1")
        .await
        .unwrap();
    assert_eq!(marked, 1, "already-deleted rows are not re-marked");
}

// ---------------------------------------------------------------------------
// Test: batch restore
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_restore_brings_rows_back(pool: PgPool) {
    let a = ProjectImageRepo::create(&pool, &new_image("r1")).await.unwrap();
    let b = ProjectImageRepo::create(&pool, &new_image("r2")).await.unwrap();
    ProjectImageRepo::batch_soft_delete(&pool, &[a.id, b.id], "user-1")
        .await
        .unwrap();

    let restored = ProjectImageRepo::batch_restore(&pool, &[a.id, b.id])
        .await
        .unwrap();
    assert_eq!(restored, 2);

    let active = ProjectImageRepo::list_by_app(&pool, "app-1", &ImageListFilter::default())
        .await
        .unwrap();
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|i| i.deleted_by.is_none()));
}

// ---------------------------------------------------------------------------
// Test: batch permanent delete returns the removed rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_hard_delete_returns_removed_rows(pool: PgPool) {
    let a = ProjectImageRepo::create(&pool, &new_image("h1")).await.unwrap();
    let b = ProjectImageRepo::create(&pool, &new_image("h2")).await.unwrap();
    // Hard delete works regardless of soft-delete state.
    ProjectImageRepo::soft_delete(&pool, a.id, "user-1").await.unwrap();

    let removed = ProjectImageRepo::batch_hard_delete(&pool, &[a.id, b.id])
        .await
        .unwrap();
    assert_eq!(removed.len(), 2);
    let mut paths: Vec<&str> = removed.iter().map(|i| i.file_path.as_str()).collect();
    paths.sort_unstable();
    assert_eq!(paths, vec!["uploads/app-1/h1.jpg", "uploads/app-1/h2.jpg"]);

    assert!(ProjectImageRepo::find_by_id_include_deleted(&pool, a.id)
        .await
        .unwrap()
        .is_none());
    assert!(ProjectImageRepo::find_by_id_include_deleted(&pool, b.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: empty input is a no-op that never touches storage
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_batches_do_not_touch_storage(pool: PgPool) {
    // With the pool closed, any statement would fail; the empty-input
    // short-circuit must succeed anyway.
    pool.close().await;

    let marked = ProjectImageRepo::batch_soft_delete(&pool, &[], "user-1")
        .await
        .unwrap();
    assert_eq!(marked, 0);

    let restored = ProjectImageRepo::batch_restore(&pool, &[]).await.unwrap();
    assert_eq!(restored, 0);

    let removed = ProjectImageRepo::batch_hard_delete(&pool, &[]).await.unwrap();
    assert!(removed.is_empty());
}
