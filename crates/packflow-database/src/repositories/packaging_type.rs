//! Packaging type catalog repository implementation.
//!
//! The catalog is maintained outside the core; only existence checks and
//! lookups live here.

use sqlx::PgPool;
use uuid::Uuid;

use packflow_core::error::{AppError, ErrorKind};
use packflow_core::result::AppResult;
use packflow_entity::packaging::PackagingType;

/// Repository for packaging type catalog lookups.
#[derive(Debug, Clone)]
pub struct PackagingTypeRepository {
    pool: PgPool,
}

impl PackagingTypeRepository {
    /// Create a new packaging type repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a packaging type by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PackagingType>> {
        sqlx::query_as::<_, PackagingType>("SELECT * FROM packaging_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find packaging type", e)
            })
    }

    /// Whether a packaging type exists and is active.
    pub async fn exists_active(&self, id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM packaging_types WHERE id = $1 AND is_active = TRUE)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check packaging type", e)
        })
    }
}
