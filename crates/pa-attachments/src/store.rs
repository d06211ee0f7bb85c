//! Attachment Store
//!
//! Page-scoped lookups used by the rendering tags.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use pa_core::traits::Id;
use pa_queries::FindOptions;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::model::Attachment;

/// Store errors
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Invalid file: {0}")]
    InvalidFile(String),
    #[error("Attachment is not on a page: {0}")]
    MissingPage(String),
    #[error("Database error: {0}")]
    Database(String),
}

pub type AttachmentResult<T> = Result<T, AttachmentError>;

/// Attachment store trait
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Find an attachment on a page by its filename
    async fn find_by_filename(
        &self,
        page_id: Id,
        filename: &str,
    ) -> AttachmentResult<Option<Attachment>>;

    /// List a page's attachments matching the options, ordered and paged
    async fn find_all(&self, page_id: Id, options: &FindOptions) -> AttachmentResult<Vec<Attachment>>;

    /// Count a page's attachments matching the options' filters
    async fn count(&self, page_id: Id, options: &FindOptions) -> AttachmentResult<usize>;
}

/// In-memory attachment store for testing and fixtures
pub struct MemoryAttachmentStore {
    attachments: RwLock<Vec<Attachment>>,
    next_id: AtomicI64,
}

impl Default for MemoryAttachmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAttachmentStore {
    pub fn new() -> Self {
        Self {
            attachments: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Save an attachment, assigning an ID and appending it to the bottom of
    /// its page's list when no position is set
    pub async fn insert(&self, mut attachment: Attachment) -> AttachmentResult<Attachment> {
        let page_id = attachment
            .page_id
            .ok_or_else(|| AttachmentError::MissingPage(attachment.filename.clone()))?;
        if attachment.extension().map_or(true, str::is_empty) {
            return Err(AttachmentError::InvalidFile(format!(
                "{} has no extension",
                attachment.filename
            )));
        }
        attachment.ensure_content_type();

        let mut attachments = self.attachments.write().await;

        match attachment.id {
            Some(id) => {
                self.next_id.fetch_max(id + 1, Ordering::SeqCst);
            }
            None => attachment.id = Some(self.next_id.fetch_add(1, Ordering::SeqCst)),
        }

        if attachment.position.is_none() {
            let last = attachments
                .iter()
                .filter(|a| a.page_id == Some(page_id))
                .filter_map(|a| a.position)
                .max()
                .unwrap_or(0);
            attachment.position = Some(last + 1);
        }

        debug!(
            id = ?attachment.id,
            page_id = page_id,
            filename = %attachment.filename,
            "Attachment stored"
        );
        attachments.push(attachment.clone());
        Ok(attachment)
    }
}

#[async_trait]
impl AttachmentStore for MemoryAttachmentStore {
    #[instrument(skip(self))]
    async fn find_by_filename(
        &self,
        page_id: Id,
        filename: &str,
    ) -> AttachmentResult<Option<Attachment>> {
        let attachments = self.attachments.read().await;
        Ok(attachments
            .iter()
            .find(|a| a.page_id == Some(page_id) && a.filename == filename)
            .cloned())
    }

    #[instrument(skip(self, options))]
    async fn find_all(&self, page_id: Id, options: &FindOptions) -> AttachmentResult<Vec<Attachment>> {
        let attachments = self.attachments.read().await;
        Ok(options.apply(
            attachments
                .iter()
                .filter(|a| a.page_id == Some(page_id))
                .cloned(),
        ))
    }

    #[instrument(skip(self, options))]
    async fn count(&self, page_id: Id, options: &FindOptions) -> AttachmentResult<usize> {
        let attachments = self.attachments.read().await;
        Ok(attachments
            .iter()
            .filter(|a| a.page_id == Some(page_id) && options.matches(*a))
            .count())
    }
}
