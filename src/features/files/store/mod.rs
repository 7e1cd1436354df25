//! Record store - durable table of file records
//!
//! The ingestion pipeline, query engine and stats aggregator talk to the
//! `RecordStore` trait only; Postgres is one backend, not an assumption.

#[cfg(test)]
pub mod memory;
mod postgres;

pub use postgres::PgRecordStore;

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::files::dtos::FileFilter;
use crate::features::files::models::{FileRecord, NewFileRecord};

/// Aggregate counters over the whole record store. savings_bytes is derived
/// at the DTO boundary, not stored.
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct StorageStats {
    pub total_files: i64,
    pub unique_files: i64,
    pub duplicates: i64,
    pub storage_logical_bytes: i64,
    pub storage_physical_bytes: i64,
}

/// Durable store of file records with the lookups the dedup pipeline needs.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a record, assigning id and uploaded_at. Returns
    /// `AppError::Conflict` when a second non-duplicate record would be
    /// created for an already-stored content hash.
    async fn insert(&self, new: NewFileRecord) -> Result<FileRecord>;

    /// Find the non-duplicate record owning the given content hash.
    /// Duplicate records never match, so a chain of duplicates always
    /// resolves to the root original.
    async fn find_original_by_hash(&self, content_hash: &str) -> Result<Option<FileRecord>>;

    /// Fetch a record by id.
    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>>;

    /// List records matching the filter, newest upload first.
    async fn list(&self, filter: &FileFilter) -> Result<Vec<FileRecord>>;

    /// Update original_filename; returns None for an unknown id.
    async fn rename(&self, id: Uuid, original_filename: &str) -> Result<Option<FileRecord>>;

    /// Delete a record by id; returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Compute aggregate stats. An empty store yields all zeros.
    async fn stats(&self) -> Result<StorageStats>;
}
