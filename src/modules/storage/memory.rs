//! In-memory blob store used as a test double.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::error::{AppError, Result};
use crate::modules::storage::BlobStore;

/// Blob store keeping payloads in a map, counting physical writes so dedup
/// tests can assert that duplicate uploads never write bytes.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    put_count: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of physical writes performed so far.
    pub fn put_count(&self) -> usize {
        self.put_count.load(Ordering::SeqCst)
    }

    /// Number of payloads currently stored.
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        self.put_count.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| AppError::Internal(format!("No blob stored at '{}'", path)))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.objects.lock().unwrap().remove(path);
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("memory://{}", path)
    }
}
