//! Retention sweeper: periodically hard-deletes soft-deleted images whose
//! retention window has expired, then reconciles the returned rows
//! against blob storage.

use std::path::PathBuf;
use std::time::Duration;

use sitecraft_db::models::project_image::DEFAULT_RETENTION_DAYS;
use sitecraft_db::repositories::ProjectImageRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitecraft_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sitecraft_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    sitecraft_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    let retention_days: i32 = std::env::var("IMAGE_RETENTION_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_RETENTION_DAYS);
    let interval_secs: u64 = std::env::var("PURGE_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3600);
    // When unset, blob removal is left to an external reconciler.
    let uploads_dir = std::env::var("UPLOADS_DIR").ok().map(PathBuf::from);

    tracing::info!(retention_days, interval_secs, "Retention sweeper starting");

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        ticker.tick().await;

        let purged = match ProjectImageRepo::purge_expired(&pool, Some(retention_days)).await {
            Ok(purged) => purged,
            Err(err) => {
                tracing::error!(%err, "Purge sweep failed");
                continue;
            }
        };
        if purged.is_empty() {
            tracing::debug!("No expired images to purge");
            continue;
        }

        let Some(dir) = &uploads_dir else { continue };
        for image in &purged {
            let path = dir.join(&image.file_path);
            if let Err(err) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), %err, "Could not remove image blob");
            }
        }
    }
}
