//! # pa-models
//!
//! Page and user models for Page Attachments RS.
//!
//! Attachments belong to a [`Page`] and remember the [`User`] who uploaded
//! them; the rendering tags only ever read these records.

pub use pa_core::traits::{Entity, Id, Identifiable};

pub mod page;
pub mod user;

pub use page::Page;
pub use user::{MemoryUserStore, User, UserStore};
