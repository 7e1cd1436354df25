//! In-memory record store used as a test double. Enforces the same
//! one-original-per-hash invariant as the Postgres partial unique index.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::FileFilter;
use crate::features::files::models::{FileRecord, NewFileRecord};
use crate::features::files::store::{RecordStore, StorageStats};

#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<FileRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

fn matches(record: &FileRecord, filter: &FileFilter) -> bool {
    if let Some(search) = &filter.search {
        if !record
            .original_filename
            .to_lowercase()
            .contains(&search.to_lowercase())
        {
            return false;
        }
    }
    if let Some(file_type) = &filter.file_type {
        if !record
            .file_type
            .to_lowercase()
            .contains(&file_type.to_lowercase())
        {
            return false;
        }
    }
    if let Some(size_min) = filter.size_min {
        if record.size < size_min {
            return false;
        }
    }
    if let Some(size_max) = filter.size_max {
        if record.size > size_max {
            return false;
        }
    }
    if let Some(date_from) = filter.date_from {
        if record.uploaded_at.date_naive() < date_from {
            return false;
        }
    }
    if let Some(date_to) = filter.date_to {
        if record.uploaded_at.date_naive() > date_to {
            return false;
        }
    }
    true
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, new: NewFileRecord) -> Result<FileRecord> {
        let mut records = self.records.lock().unwrap();

        if !new.is_duplicate {
            if let Some(hash) = &new.content_hash {
                let taken = records
                    .iter()
                    .any(|r| !r.is_duplicate && r.content_hash.as_deref() == Some(hash));
                if taken {
                    return Err(AppError::Conflict(
                        "An original record already exists for this content hash".to_string(),
                    ));
                }
            }
        }

        let record = FileRecord {
            id: Uuid::new_v4(),
            storage_path: new.storage_path,
            original_filename: new.original_filename,
            file_type: new.file_type,
            size: new.size,
            uploaded_at: Utc::now(),
            content_hash: new.content_hash,
            is_duplicate: new.is_duplicate,
            duplicate_of: new.duplicate_of,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn find_original_by_hash(&self, content_hash: &str) -> Result<Option<FileRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| !r.is_duplicate && r.content_hash.as_deref() == Some(content_hash))
            .cloned())
    }

    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list(&self, filter: &FileFilter) -> Result<Vec<FileRecord>> {
        let mut matching: Vec<FileRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| matches(r, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(matching)
    }

    async fn rename(&self, id: Uuid, original_filename: &str) -> Result<Option<FileRecord>> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.original_filename = original_filename.to_string();
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        // Duplicates of a deleted original keep their rows, FK-style SET NULL
        for record in records.iter_mut() {
            if record.duplicate_of == Some(id) {
                record.duplicate_of = None;
            }
        }
        Ok(records.len() < before)
    }

    async fn stats(&self) -> Result<StorageStats> {
        let records = self.records.lock().unwrap();
        let mut stats = StorageStats::default();
        for record in records.iter() {
            stats.total_files += 1;
            stats.storage_logical_bytes += record.size;
            if record.is_duplicate {
                stats.duplicates += 1;
            } else {
                stats.unique_files += 1;
                stats.storage_physical_bytes += record.size;
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(hash: &str, is_duplicate: bool) -> NewFileRecord {
        NewFileRecord {
            storage_path: "uploads/test.bin".to_string(),
            original_filename: "test.bin".to_string(),
            file_type: "application/octet-stream".to_string(),
            size: 4,
            content_hash: Some(hash.to_string()),
            is_duplicate,
            duplicate_of: None,
        }
    }

    #[tokio::test]
    async fn rejects_second_original_for_same_hash() {
        let store = MemoryRecordStore::new();
        store.insert(new_record("aaaa", false)).await.unwrap();

        let err = store.insert(new_record("aaaa", false)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn duplicate_rows_never_conflict() {
        let store = MemoryRecordStore::new();
        store.insert(new_record("aaaa", false)).await.unwrap();
        store.insert(new_record("aaaa", true)).await.unwrap();
        store.insert(new_record("aaaa", true)).await.unwrap();
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn delete_detaches_duplicates_without_removing_them() {
        let store = MemoryRecordStore::new();
        let original = store.insert(new_record("aaaa", false)).await.unwrap();
        let mut dup = new_record("aaaa", true);
        dup.duplicate_of = Some(original.id);
        let dup = store.insert(dup).await.unwrap();

        assert!(store.delete(original.id).await.unwrap());

        let survivor = store.get(dup.id).await.unwrap().unwrap();
        assert!(survivor.is_duplicate);
        assert_eq!(survivor.duplicate_of, None);
    }
}
