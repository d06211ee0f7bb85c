//! Storage Abstraction
//!
//! Attachment files live in a remote object store; this crate only needs the
//! public URL a stored object is served from.

use std::sync::Arc;

use async_trait::async_trait;
use pa_core::config::{StorageBackend, StorageConfig};
use thiserror::Error;
use tracing::info;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unknown size variant: {0}")]
    UnknownVariant(String),
    #[error("Attachment {0} has not been saved")]
    Unsaved(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage trait - unified interface for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Public URL for the object stored under `key`
    async fn url(&self, key: &str) -> StorageResult<String>;

    /// Get storage name for logging
    fn name(&self) -> &str;
}

fn check_key(key: &str) -> StorageResult<()> {
    // Prevent directory traversal; dots inside a file name are fine
    let traverses = key.split(|c| c == '/' || c == '\\').any(|segment| segment == "..");
    if key.is_empty() || traverses || key.starts_with('/') || key.starts_with('\\') {
        return Err(StorageError::InvalidPath(key.to_string()));
    }
    Ok(())
}

/// Files served from a local directory under a base URL
pub struct LocalStorage {
    /// Base URL for generating URLs
    base_url: String,
}

impl LocalStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn url(&self, key: &str) -> StorageResult<String> {
        check_key(key)?;
        Ok(format!("{}/{}", self.base_url, key))
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// S3-compatible object storage
pub struct S3Storage {
    bucket: String,
    region: String,
    endpoint: Option<String>,
    path_style: bool,
}

impl S3Storage {
    pub fn new(config: &StorageConfig) -> Self {
        info!(bucket = %config.bucket, region = %config.region, "S3 storage initialized");
        Self {
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
            path_style: config.path_style,
        }
    }

    fn key_url(&self, key: &str) -> String {
        match self.endpoint.as_deref().map(|e| e.trim_end_matches('/')) {
            Some(endpoint) if self.path_style => {
                format!("{}/{}/{}", endpoint, self.bucket, key)
            }
            Some(endpoint) => {
                let (scheme, host) = match endpoint.split_once("://") {
                    Some((scheme, host)) => (scheme, host),
                    None => ("https", endpoint),
                };
                format!("{}://{}.{}/{}", scheme, self.bucket, host, key)
            }
            None if self.path_style => {
                format!("https://s3.{}.amazonaws.com/{}/{}", self.region, self.bucket, key)
            }
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn url(&self, key: &str) -> StorageResult<String> {
        check_key(key)?;
        Ok(self.key_url(key))
    }

    fn name(&self) -> &str {
        "s3"
    }
}

/// Build the configured storage backend
pub fn storage_from_config(config: &StorageConfig) -> Arc<dyn Storage> {
    match config.backend {
        StorageBackend::S3 => Arc::new(S3Storage::new(config)),
        StorageBackend::Local => Arc::new(LocalStorage::new(config.base_url.clone())),
    }
}
