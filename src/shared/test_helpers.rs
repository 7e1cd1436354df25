#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::features::files::routes;
#[cfg(test)]
use crate::features::files::services::FileService;
#[cfg(test)]
use crate::features::files::store::memory::MemoryRecordStore;
#[cfg(test)]
use crate::modules::storage::memory::MemoryBlobStore;

#[cfg(test)]
pub const TEST_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Build a FileService over in-memory stores, returning the stores so tests
/// can inspect record and blob state directly.
#[cfg(test)]
pub fn memory_service() -> (
    Arc<FileService>,
    Arc<MemoryRecordStore>,
    Arc<MemoryBlobStore>,
) {
    let records = Arc::new(MemoryRecordStore::new());
    let blobs = Arc::new(MemoryBlobStore::new());
    let service = Arc::new(FileService::new(records.clone(), blobs.clone()));
    (service, records, blobs)
}

/// Build the files router over in-memory stores for handler-level tests.
#[cfg(test)]
pub fn memory_router() -> (
    axum::Router,
    Arc<MemoryRecordStore>,
    Arc<MemoryBlobStore>,
) {
    let (service, records, blobs) = memory_service();
    (routes::routes(service, TEST_MAX_UPLOAD_SIZE), records, blobs)
}
