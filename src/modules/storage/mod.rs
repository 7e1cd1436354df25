//! Storage module - blob persistence for file payloads
//!
//! The service only ever talks to the `BlobStore` trait; the production
//! implementation targets MinIO or any S3-compatible endpoint.

mod s3_client;

#[cfg(test)]
pub mod memory;

pub use s3_client::S3BlobStore;

use async_trait::async_trait;

use crate::core::error::Result;

/// Opaque byte store keyed by path. Writes are whole-payload; duplicates
/// are never written twice, so a path is only ever put once.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `data` at `path` with the given content type.
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    /// Fetch the bytes stored at `path`.
    async fn get(&self, path: &str) -> Result<Vec<u8>>;

    /// Remove the bytes stored at `path`.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Externally resolvable URL for the payload at `path`.
    fn url(&self, path: &str) -> String;
}
