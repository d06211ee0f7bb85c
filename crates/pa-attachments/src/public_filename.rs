//! Public filename derivation
//!
//! Objects are keyed `page_attachments/{id}/{filename}`; a size variant is
//! stored next to the original as `{basename}_{variant}.{ext}`.

use std::sync::Arc;

use pa_core::config::ThumbnailConfig;
use pa_core::traits::Entity;
use tracing::debug;

use crate::model::{thumbnail_filename, Attachment};
use crate::storage::{Storage, StorageError, StorageResult};

/// Derives public URLs for attachments and their size variants
#[derive(Clone)]
pub struct PublicFilenames {
    storage: Arc<dyn Storage>,
    sizes: ThumbnailConfig,
}

impl PublicFilenames {
    pub fn new(storage: Arc<dyn Storage>, sizes: ThumbnailConfig) -> Self {
        Self { storage, sizes }
    }

    pub fn sizes(&self) -> &ThumbnailConfig {
        &self.sizes
    }

    /// Object key for an attachment, optionally for a named size variant
    pub fn key_for(&self, attachment: &Attachment, variant: Option<&str>) -> StorageResult<String> {
        let id = attachment
            .id
            .ok_or_else(|| StorageError::Unsaved(attachment.filename.clone()))?;

        let filename = match variant {
            None => attachment.filename.clone(),
            Some(name) => {
                if self.sizes.get(name).is_none() {
                    return Err(StorageError::UnknownVariant(name.to_string()));
                }
                thumbnail_filename(&attachment.filename, name)
            }
        };

        Ok(format!("{}/{}/{}", Attachment::TABLE_NAME, id, filename))
    }

    /// Public URL of an attachment or one of its size variants
    pub async fn public_filename(
        &self,
        attachment: &Attachment,
        variant: Option<&str>,
    ) -> StorageResult<String> {
        let key = self.key_for(attachment, variant)?;
        let url = self.storage.url(&key).await?;
        debug!(storage = self.storage.name(), key = %key, "Derived public filename");
        Ok(url)
    }
}
