//! Site directory repository implementation.
//!
//! Read-only: site maintenance is an external collaborator. The core
//! reads sites for load-number prefixes and farm/depot timing defaults.

use sqlx::PgPool;
use uuid::Uuid;

use packflow_core::error::{AppError, ErrorKind};
use packflow_core::result::AppResult;
use packflow_entity::site::Site;

/// Repository for site directory lookups.
#[derive(Debug, Clone)]
pub struct SiteRepository {
    pool: PgPool,
}

impl SiteRepository {
    /// Create a new site repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a site by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Site>> {
        sqlx::query_as::<_, Site>("SELECT * FROM sites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find site", e))
    }

    /// Whether a site exists and is active.
    pub async fn exists_active(&self, id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM sites WHERE id = $1 AND is_active = TRUE)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check site", e))
    }
}
