//! Rendering context
//!
//! A context is never mutated while rendering. Container tags derive a child
//! context for their body, so an attachment set for one body is invisible to
//! its siblings.

use std::sync::Arc;

use pa_attachments::Attachment;
use pa_core::traits::Id;
use pa_models::Page;

use crate::error::{TagError, TagResult};

#[derive(Debug, Clone)]
pub struct RenderContext {
    page: Arc<Page>,
    attachment: Option<Arc<Attachment>>,
    enclosing: Vec<String>,
}

impl RenderContext {
    pub fn new(page: Page) -> Self {
        Self {
            page: Arc::new(page),
            attachment: None,
            enclosing: Vec::new(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_id(&self) -> TagResult<Id> {
        self.page.id.ok_or(TagError::UnsavedPage)
    }

    /// The attachment set by an enclosing tag
    pub fn attachment(&self) -> Option<&Arc<Attachment>> {
        self.attachment.as_ref()
    }

    /// Names of the enclosing tags, outermost first
    pub fn enclosing(&self) -> &[String] {
        &self.enclosing
    }

    /// Same context with a different current attachment
    pub fn with_attachment(&self, attachment: Option<Arc<Attachment>>) -> Self {
        Self {
            page: Arc::clone(&self.page),
            attachment,
            enclosing: self.enclosing.clone(),
        }
    }

    /// Context for the body of the tag `name`
    pub fn entering(&self, name: &str) -> Self {
        let mut enclosing = self.enclosing.clone();
        enclosing.push(name.to_string());
        Self {
            page: Arc::clone(&self.page),
            attachment: self.attachment.clone(),
            enclosing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_contexts_do_not_leak() {
        let root = RenderContext::new(Page::new(1, "Home", "home"));
        let logo = Arc::new(Attachment::new(1, "logo.png", 1));

        let child = root.entering("attachment").with_attachment(Some(logo));
        assert_eq!(child.attachment().map(|a| a.filename.as_str()), Some("logo.png"));
        assert_eq!(child.enclosing(), ["attachment".to_string()]);

        assert!(root.attachment().is_none());
        assert!(root.enclosing().is_empty());
        assert_eq!(root.page_id().unwrap(), 1);
    }

    #[test]
    fn test_unsaved_page() {
        let mut page = Page::new(1, "Draft", "draft");
        page.id = None;
        let ctx = RenderContext::new(page);
        assert!(matches!(ctx.page_id(), Err(TagError::UnsavedPage)));
    }
}
