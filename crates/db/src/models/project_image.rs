//! Project image entity model and DTOs.
//!
//! Covers the `project_images` table: per-app uploaded image metadata
//! with de-duplication hashes, usage counters, and a two-phase delete
//! lifecycle (active → soft-deleted → purged after the retention window,
//! with restore back to active).

use serde::{Deserialize, Serialize};
use sitecraft_core::types::{ImageId, Timestamp};
use sqlx::FromRow;

/// Soft-deleted images older than this many days are eligible for
/// permanent removal.
pub const DEFAULT_RETENTION_DAYS: i32 = 30;

/// A row from the `project_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectImage {
    pub id: ImageId,
    pub app_id: String,
    pub user_id: String,
    pub file_path: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    /// SHA-256 hex digest of the file contents. Together with `app_id`
    /// this is the de-duplication lookup key; uniqueness is not enforced
    /// by the schema, callers check via `find_by_hash` before inserting.
    pub content_hash: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub format: Option<String>,
    pub is_optimized: bool,
    /// Pre-optimization size, when the upload pipeline recompressed it.
    pub original_size_bytes: Option<i64>,
    pub compression_ratio: Option<f64>,
    pub is_background_image: bool,
    pub usage_count: i32,
    pub last_referenced_at: Option<Timestamp>,
    pub uploaded_at: Timestamp,
    /// NULL means active; non-NULL means soft-deleted.
    pub deleted_at: Option<Timestamp>,
    pub deleted_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project image.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectImage {
    pub app_id: String,
    pub user_id: String,
    pub file_path: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub content_hash: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub format: Option<String>,
    /// Defaults to `false` if omitted.
    pub is_optimized: Option<bool>,
    pub original_size_bytes: Option<i64>,
    pub compression_ratio: Option<f64>,
    /// Defaults to `false` if omitted.
    pub is_background_image: Option<bool>,
}

/// DTO for updating an existing project image.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectImage {
    pub file_path: Option<String>,
    pub is_optimized: Option<bool>,
    pub original_size_bytes: Option<i64>,
    pub compression_ratio: Option<f64>,
    pub is_background_image: Option<bool>,
}

/// Which delete states a listing should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Only rows with `deleted_at IS NULL` (the default).
    ActiveOnly,
    /// Active and soft-deleted rows.
    All,
    /// Only soft-deleted rows.
    DeletedOnly,
}

/// Listing filter flags as received from callers.
///
/// The three modes are mutually exclusive; `only_deleted` wins when both
/// flags are set.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ImageListFilter {
    pub include_deleted: bool,
    pub only_deleted: bool,
}

impl ImageListFilter {
    /// Collapse the filter flags into a single listing scope.
    pub fn scope(&self) -> ListScope {
        if self.only_deleted {
            ListScope::DeletedOnly
        } else if self.include_deleted {
            ListScope::All
        } else {
            ListScope::ActiveOnly
        }
    }
}

/// Aggregate storage counters for one app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    pub total_images: i64,
    pub active_images: i64,
    pub deleted_images: i64,
    pub total_bytes: i64,
    pub active_bytes: i64,
    pub deleted_bytes: i64,
}

impl StorageStats {
    /// Fold rows (active and soft-deleted) into aggregate counters.
    pub fn from_rows(rows: &[ProjectImage]) -> Self {
        rows.iter().fold(Self::default(), |mut stats, row| {
            stats.total_images += 1;
            stats.total_bytes += row.size_bytes;
            if row.deleted_at.is_some() {
                stats.deleted_images += 1;
                stats.deleted_bytes += row.size_bytes;
            } else {
                stats.active_images += 1;
                stats.active_bytes += row.size_bytes;
            }
            stats
        })
    }
}
