//! MinIO/S3-compatible blob store
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::modules::storage::BlobStore;

/// Blob store backed by MinIO or any S3-compatible service
pub struct S3BlobStore {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    public_endpoint: String,
}

impl S3BlobStore {
    /// Create a new blob store from configuration and ensure the bucket exists.
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create S3 credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create S3 bucket handle: {}", e)))?;

        // Use path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let store = Self {
            bucket,
            region,
            credentials,
            public_endpoint: config.public_endpoint,
        };

        store.ensure_bucket_exists().await?;

        info!(
            "Blob store initialized for endpoint: {}, bucket: {}",
            config.endpoint,
            store.bucket.name()
        );

        Ok(store)
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> Result<()> {
        // Try to create bucket - if it already exists, MinIO will return an error
        // which we can safely ignore
        match self.create_bucket().await {
            Ok(_) => {
                info!("Bucket '{}' created successfully", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                // Bucket already exists - this is fine
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                    Ok(())
                } else {
                    // Log warning but don't fail - bucket might exist with different error
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                    Ok(())
                }
            }
        }
    }

    /// Create the bucket
    async fn create_bucket(&self) -> Result<()> {
        let bucket_config = BucketConfiguration::default();

        Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            bucket_config,
        )
        .await
        .map_err(|e| {
            AppError::Internal(format!(
                "Failed to create bucket '{}': {}",
                self.bucket.name(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the bucket name
    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        self.bucket
            .put_object_with_content_type(path, &data, content_type)
            .await
            .map_err(|e| {
                AppError::StorageWrite(format!("Failed to upload blob '{}': {}", path, e))
            })?;

        debug!("Uploaded blob '{}' to bucket '{}'", path, self.bucket.name());
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.bucket.get_object(path).await.map_err(|e| {
            AppError::Internal(format!("Failed to download blob '{}': {}", path, e))
        })?;

        debug!(
            "Downloaded blob '{}' from bucket '{}'",
            path,
            self.bucket.name()
        );
        Ok(response.to_vec())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.bucket
            .delete_object(path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete blob '{}': {}", path, e)))?;

        debug!(
            "Deleted blob '{}' from bucket '{}'",
            path,
            self.bucket.name()
        );
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), path)
    }
}
