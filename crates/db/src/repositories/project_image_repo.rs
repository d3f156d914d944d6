//! Repository for the `project_images` table.
//!
//! Every method issues exactly one statement: single-statement atomicity
//! is the only isolation guarantee, and there are no retries, no caching,
//! and no multi-table transactions. Storage failures propagate unchanged.

use sqlx::PgPool;
use uuid::Uuid;

use sitecraft_core::types::ImageId;

use crate::models::project_image::{
    CreateProjectImage, ImageListFilter, ListScope, ProjectImage, StorageStats,
    UpdateProjectImage, DEFAULT_RETENTION_DAYS,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, app_id, user_id, file_path, original_name, mime_type, size_bytes, \
    content_hash, width, height, format, is_optimized, original_size_bytes, \
    compression_ratio, is_background_image, usage_count, last_referenced_at, \
    uploaded_at, deleted_at, deleted_by, created_at, updated_at";

/// Provides CRUD and lifecycle operations for project images.
pub struct ProjectImageRepo;

impl ProjectImageRepo {
    /// Insert a new image row, returning the created row.
    ///
    /// Generates a fresh v7 UUID; `usage_count` starts at 0 and the
    /// upload/creation timestamps are stamped to now. No duplicate check
    /// is performed here -- callers wanting de-duplication call
    /// [`Self::find_by_hash`] first.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProjectImage,
    ) -> Result<ProjectImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_images \
                 (id, app_id, user_id, file_path, original_name, mime_type, \
                  size_bytes, content_hash, width, height, format, is_optimized, \
                  original_size_bytes, compression_ratio, is_background_image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, \
                     COALESCE($12, false), $13, $14, COALESCE($15, false)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(Uuid::now_v7())
            .bind(&input.app_id)
            .bind(&input.user_id)
            .bind(&input.file_path)
            .bind(&input.original_name)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .bind(&input.content_hash)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.format)
            .bind(input.is_optimized)
            .bind(input.original_size_bytes)
            .bind(input.compression_ratio)
            .bind(input.is_background_image)
            .fetch_one(pool)
            .await
    }

    /// De-duplication lookup: the active (not soft-deleted) row matching
    /// a content hash within an app, or `None`.
    pub async fn find_by_hash(
        pool: &PgPool,
        content_hash: &str,
        app_id: &str,
    ) -> Result<Option<ProjectImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_images \
             WHERE content_hash = $1 AND app_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(content_hash)
            .bind(app_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an image by its ID. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: ImageId,
    ) -> Result<Option<ProjectImage>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM project_images WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an image by ID regardless of soft-delete state. Used by the
    /// trash UI and the restore flow.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: ImageId,
    ) -> Result<Option<ProjectImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_images WHERE id = $1");
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an app's images ordered by most recently uploaded first,
    /// scoped per the filter (active-only by default).
    pub async fn list_by_app(
        pool: &PgPool,
        app_id: &str,
        filter: &ImageListFilter,
    ) -> Result<Vec<ProjectImage>, sqlx::Error> {
        let predicate = match filter.scope() {
            ListScope::ActiveOnly => " AND deleted_at IS NULL",
            ListScope::All => "",
            ListScope::DeletedOnly => " AND deleted_at IS NOT NULL",
        };
        let query = format!(
            "SELECT {COLUMNS} FROM project_images \
             WHERE app_id = $1{predicate} \
             ORDER BY uploaded_at DESC"
        );
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(app_id)
            .fetch_all(pool)
            .await
    }

    /// Update an image. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: ImageId,
        input: &UpdateProjectImage,
    ) -> Result<Option<ProjectImage>, sqlx::Error> {
        let query = format!(
            "UPDATE project_images SET \
                 file_path = COALESCE($2, file_path), \
                 is_optimized = COALESCE($3, is_optimized), \
                 original_size_bytes = COALESCE($4, original_size_bytes), \
                 compression_ratio = COALESCE($5, compression_ratio), \
                 is_background_image = COALESCE($6, is_background_image), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(id)
            .bind(&input.file_path)
            .bind(input.is_optimized)
            .bind(input.original_size_bytes)
            .bind(input.compression_ratio)
            .bind(input.is_background_image)
            .fetch_optional(pool)
            .await
    }

    /// Record one use of an image: bumps `usage_count` and refreshes
    /// `last_referenced_at`. Fire-and-forget; an unknown `id` is not an
    /// error.
    pub async fn record_usage(pool: &PgPool, id: ImageId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE project_images SET \
                 usage_count = usage_count + 1, \
                 last_referenced_at = NOW(), \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Soft-delete an image, recording who deleted it. Returns `true` if
    /// a previously-active row was marked.
    pub async fn soft_delete(
        pool: &PgPool,
        id: ImageId,
        deleted_by: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_images SET \
                 deleted_at = NOW(), deleted_by = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(deleted_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted image, clearing the delete markers.
    /// Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: ImageId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_images SET \
                 deleted_at = NULL, deleted_by = NULL, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete soft-deleted images whose `deleted_at` is older
    /// than the retention window (default 30 days; 0 purges every
    /// soft-deleted row immediately).
    ///
    /// Returns the removed rows so the caller can reconcile blob storage;
    /// this repository never touches the underlying files.
    pub async fn purge_expired(
        pool: &PgPool,
        retention_days: Option<i32>,
    ) -> Result<Vec<ProjectImage>, sqlx::Error> {
        let days = retention_days.unwrap_or(DEFAULT_RETENTION_DAYS);
        let query = format!(
            "DELETE FROM project_images \
             WHERE deleted_at IS NOT NULL \
               AND deleted_at < NOW() - make_interval(days => $1) \
             RETURNING {COLUMNS}"
        );
        let purged = sqlx::query_as::<_, ProjectImage>(&query)
            .bind(days)
            .fetch_all(pool)
            .await?;
        if !purged.is_empty() {
            tracing::info!(count = purged.len(), retention_days = days, "Purged expired images");
        }
        Ok(purged)
    }

    /// Soft-delete a set of images in one statement. Empty input is a
    /// no-op returning 0 without touching storage. Returns the number of
    /// rows newly marked (already-deleted rows are not counted).
    pub async fn batch_soft_delete(
        pool: &PgPool,
        ids: &[ImageId],
        deleted_by: &str,
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE project_images SET \
                 deleted_at = NOW(), deleted_by = $2, updated_at = NOW() \
             WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .bind(deleted_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Restore a set of soft-deleted images in one statement. Empty input
    /// is a no-op returning 0 without touching storage.
    pub async fn batch_restore(pool: &PgPool, ids: &[ImageId]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE project_images SET \
                 deleted_at = NULL, deleted_by = NULL, updated_at = NOW() \
             WHERE id = ANY($1) AND deleted_at IS NOT NULL",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Permanently delete a set of images in one statement, regardless of
    /// soft-delete state. Empty input is a no-op returning an empty vec.
    /// Returns the removed rows for blob reconciliation.
    pub async fn batch_hard_delete(
        pool: &PgPool,
        ids: &[ImageId],
    ) -> Result<Vec<ProjectImage>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query =
            format!("DELETE FROM project_images WHERE id = ANY($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Aggregate storage counters for an app, over active and deleted
    /// rows alike.
    pub async fn storage_stats(pool: &PgPool, app_id: &str) -> Result<StorageStats, sqlx::Error> {
        let rows = Self::list_by_app(
            pool,
            app_id,
            &ImageListFilter {
                include_deleted: true,
                only_deleted: false,
            },
        )
        .await?;
        Ok(StorageStats::from_rows(&rows))
    }
}
