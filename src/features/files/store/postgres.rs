use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::FileFilter;
use crate::features::files::models::{FileRecord, NewFileRecord};
use crate::features::files::store::{RecordStore, StorageStats};

const RECORD_COLUMNS: &str = "id, storage_path, original_filename, file_type, size, \
     uploaded_at, content_hash, is_duplicate, duplicate_of";

/// Record store backed by the Postgres `files` table
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, new: NewFileRecord) -> Result<FileRecord> {
        let sql = format!(
            "INSERT INTO files (id, storage_path, original_filename, file_type, size, \
             content_hash, is_duplicate, duplicate_of) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {RECORD_COLUMNS}"
        );

        sqlx::query_as::<_, FileRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new.storage_path)
            .bind(&new.original_filename)
            .bind(&new.file_type)
            .bind(new.size)
            .bind(&new.content_hash)
            .bind(new.is_duplicate)
            .bind(new.duplicate_of)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
                    "An original record already exists for this content hash".to_string(),
                ),
                _ => {
                    tracing::error!("Failed to insert file record: {:?}", e);
                    AppError::Database(e)
                }
            })
    }

    async fn find_original_by_hash(&self, content_hash: &str) -> Result<Option<FileRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM files \
             WHERE content_hash = $1 AND NOT is_duplicate \
             LIMIT 1"
        );

        sqlx::query_as::<_, FileRecord>(&sql)
            .bind(content_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up original by hash: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM files WHERE id = $1");

        sqlx::query_as::<_, FileRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get file record: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list(&self, filter: &FileFilter) -> Result<Vec<FileRecord>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {RECORD_COLUMNS} FROM files WHERE TRUE"));

        if let Some(search) = &filter.search {
            qb.push(" AND original_filename ILIKE ")
                .push_bind(format!("%{}%", search));
        }
        if let Some(file_type) = &filter.file_type {
            qb.push(" AND file_type ILIKE ")
                .push_bind(format!("%{}%", file_type));
        }
        if let Some(size_min) = filter.size_min {
            qb.push(" AND size >= ").push_bind(size_min);
        }
        if let Some(size_max) = filter.size_max {
            qb.push(" AND size <= ").push_bind(size_max);
        }
        if let Some(date_from) = filter.date_from {
            qb.push(" AND uploaded_at::date >= ").push_bind(date_from);
        }
        if let Some(date_to) = filter.date_to {
            qb.push(" AND uploaded_at::date <= ").push_bind(date_to);
        }

        qb.push(" ORDER BY uploaded_at DESC");

        qb.build_query_as::<FileRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list file records: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn rename(&self, id: Uuid, original_filename: &str) -> Result<Option<FileRecord>> {
        let sql = format!(
            "UPDATE files SET original_filename = $2 WHERE id = $1 RETURNING {RECORD_COLUMNS}"
        );

        sqlx::query_as::<_, FileRecord>(&sql)
            .bind(id)
            .bind(original_filename)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to rename file record: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete file record: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> Result<StorageStats> {
        // SUM(BIGINT) comes back as NUMERIC, hence the casts
        sqlx::query_as::<_, StorageStats>(
            "SELECT \
                 COUNT(*) AS total_files, \
                 COUNT(*) FILTER (WHERE NOT is_duplicate) AS unique_files, \
                 COUNT(*) FILTER (WHERE is_duplicate) AS duplicates, \
                 COALESCE(SUM(size), 0)::BIGINT AS storage_logical_bytes, \
                 COALESCE(SUM(size) FILTER (WHERE NOT is_duplicate), 0)::BIGINT \
                     AS storage_physical_bytes \
             FROM files",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute storage stats: {:?}", e);
            AppError::Database(e)
        })
    }
}
