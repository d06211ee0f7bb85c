//! # pa-attachments
//!
//! Page attachment records for Page Attachments RS.
//!
//! ## Features
//!
//! - Attachment metadata and truncation helpers (`short_title`, ...)
//! - Public filename derivation through a storage backend (S3-compatible, local)
//! - Named thumbnail size variants
//! - Attachment stores scoped to a page
//!
//! ## Example
//!
//! ```rust,ignore
//! use pa_attachments::{Attachment, MemoryAttachmentStore, PublicFilenames, LocalStorage};
//! use std::sync::Arc;
//!
//! let store = MemoryAttachmentStore::new();
//! let logo = store.insert(Attachment::new(1, "logo.png", 2048)).await?;
//!
//! let files = PublicFilenames::new(Arc::new(LocalStorage::new("/files")), Default::default());
//! let url = files.public_filename(&logo, Some("thumb")).await?;
//! assert_eq!(url, "/files/page_attachments/1/logo_thumb.png");
//! ```

pub mod model;
pub mod public_filename;
pub mod storage;
pub mod store;

pub use model::{
    thumbnail_filename, truncate, Attachment, DEFAULT_TRUNCATE_LENGTH, DEFAULT_TRUNCATE_SUFFIX,
};
pub use public_filename::PublicFilenames;
pub use storage::{storage_from_config, LocalStorage, S3Storage, Storage, StorageError, StorageResult};
pub use store::{AttachmentError, AttachmentResult, AttachmentStore, MemoryAttachmentStore};
