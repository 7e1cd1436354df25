use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{FileFilter, FileQueryParams, FileResponseDto, StorageStatsDto};
use crate::features::files::models::{FileRecord, NewFileRecord};
use crate::features::files::services::hasher::ContentHasher;
use crate::features::files::store::RecordStore;
use crate::modules::storage::BlobStore;
use crate::shared::constants::{DEFAULT_EXTENSION, UPLOAD_PREFIX};

/// An upload as it arrives from the transport layer, fully buffered so the
/// bytes stay re-readable after hashing.
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub original_filename: String,
    pub file_type: String,
}

/// Service for content-addressed file intake: hashing, dedup linking,
/// filtered listing and storage stats.
pub struct FileService {
    records: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
}

impl FileService {
    pub fn new(records: Arc<dyn RecordStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { records, blobs }
    }

    /// Ingest an upload: fingerprint the content, then either link it to an
    /// existing original (no bytes written) or write the payload to the blob
    /// store under a fresh path and record it as a new original.
    pub async fn ingest(&self, upload: UploadedFile) -> Result<FileResponseDto> {
        let UploadedFile {
            data,
            original_filename,
            file_type,
        } = upload;

        if data.is_empty() {
            return Err(AppError::Validation("No file provided".to_string()));
        }

        let size = data.len() as i64;
        let content_hash = ContentHasher::digest_hex(&data);

        if let Some(original) = self.records.find_original_by_hash(&content_hash).await? {
            debug!(
                "Content {} already stored at {}, linking duplicate",
                content_hash, original.storage_path
            );
            return self
                .link_duplicate(original_filename, file_type, size, content_hash, &original)
                .await;
        }

        // New content: physical write first, so a failed write never leaves
        // a record referencing an unwritten blob
        let storage_path = generate_storage_path(&original_filename);
        let blob_content_type = if file_type.is_empty() {
            "application/octet-stream"
        } else {
            &file_type
        };
        self.blobs
            .put(&storage_path, data, blob_content_type)
            .await?;

        let inserted = self
            .records
            .insert(NewFileRecord {
                storage_path: storage_path.clone(),
                original_filename: original_filename.clone(),
                file_type: file_type.clone(),
                size,
                content_hash: Some(content_hash.clone()),
                is_duplicate: false,
                duplicate_of: None,
            })
            .await;

        let record = match inserted {
            Ok(record) => record,
            // Lost the check-then-act race: a concurrent upload of the same
            // content inserted its original first. Drop our blob and link
            // against the winner.
            Err(AppError::Conflict(_)) => {
                warn!(
                    "Concurrent upload won the original slot for {}, relinking as duplicate",
                    content_hash
                );
                if let Err(e) = self.blobs.delete(&storage_path).await {
                    warn!("Failed to remove losing blob '{}': {}", storage_path, e);
                }
                let original = self
                    .records
                    .find_original_by_hash(&content_hash)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "Original record for hash {} vanished after insert conflict",
                            content_hash
                        ))
                    })?;
                return self
                    .link_duplicate(original_filename, file_type, size, content_hash, &original)
                    .await;
            }
            Err(e) => return Err(e),
        };

        info!(
            "Stored new content: id={}, path={}, size={}, hash={}",
            record.id, record.storage_path, record.size, content_hash
        );

        Ok(self.to_dto(record))
    }

    /// Record a duplicate upload against an existing original. Shares the
    /// original's storage path; writes no bytes. The record keeps the hash
    /// computed from the incoming bytes rather than the stored one.
    async fn link_duplicate(
        &self,
        original_filename: String,
        file_type: String,
        size: i64,
        content_hash: String,
        original: &FileRecord,
    ) -> Result<FileResponseDto> {
        let record = self
            .records
            .insert(NewFileRecord {
                storage_path: original.storage_path.clone(),
                original_filename,
                file_type,
                size,
                content_hash: Some(content_hash),
                is_duplicate: true,
                duplicate_of: Some(original.id),
            })
            .await?;

        info!(
            "Linked duplicate: id={}, duplicate_of={}, path={}",
            record.id, original.id, record.storage_path
        );

        Ok(self.to_dto(record))
    }

    /// List records matching the query, newest upload first. Malformed
    /// numeric/date bounds have already been dropped by the filter parse.
    pub async fn list(&self, params: FileQueryParams) -> Result<Vec<FileResponseDto>> {
        let filter = FileFilter::from_query(params);
        let records = self.records.list(&filter).await?;
        Ok(records.into_iter().map(|r| self.to_dto(r)).collect())
    }

    /// Storage savings stats over the whole record store.
    pub async fn stats(&self) -> Result<StorageStatsDto> {
        let stats = self.records.stats().await?;
        Ok(StorageStatsDto {
            total_files: stats.total_files,
            unique_files: stats.unique_files,
            duplicates: stats.duplicates,
            storage_logical_bytes: stats.storage_logical_bytes,
            storage_physical_bytes: stats.storage_physical_bytes,
            savings_bytes: stats.storage_logical_bytes - stats.storage_physical_bytes,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<FileResponseDto> {
        let record = self
            .records
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;
        Ok(self.to_dto(record))
    }

    /// Fetch a record together with its stored payload. Duplicates read
    /// from the original's path.
    pub async fn download(&self, id: Uuid) -> Result<(FileRecord, Vec<u8>)> {
        let record = self
            .records
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;
        let data = self.blobs.get(&record.storage_path).await?;
        Ok((record, data))
    }

    pub async fn rename(&self, id: Uuid, original_filename: &str) -> Result<FileResponseDto> {
        let name = original_filename.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "original_filename must not be empty".to_string(),
            ));
        }

        let record = self
            .records
            .rename(id, name)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        info!("Renamed file record: id={}, name={}", record.id, name);

        Ok(self.to_dto(record))
    }

    /// Delete a record. The payload stays in the blob store: duplicates may
    /// still reference an original's path, and the data model keeps no
    /// reference counts to know when bytes become unreachable.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = self.records.delete(id).await?;
        if !deleted {
            return Err(AppError::NotFound("File not found".to_string()));
        }

        info!("Deleted file record: id={}", id);
        Ok(())
    }

    fn to_dto(&self, record: FileRecord) -> FileResponseDto {
        let file_url = self.blobs.url(&record.storage_path);
        FileResponseDto::from_record(record, file_url)
    }
}

/// Fresh storage path for a physical write: random key, collision-safe
/// across concurrent uploads, keeping only the extension for readability.
fn generate_storage_path(original_filename: &str) -> String {
    let extension = original_filename
        .rsplit('.')
        .next()
        .filter(|ext| !ext.is_empty() && *ext != original_filename)
        .unwrap_or(DEFAULT_EXTENSION);
    format!("{}/{}.{}", UPLOAD_PREFIX, Uuid::new_v4(), extension)
}
