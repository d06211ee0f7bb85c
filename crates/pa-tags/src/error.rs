//! Rendering errors

use pa_attachments::AttachmentError;
use pa_core::error::PaError;
use thiserror::Error;

/// Template syntax errors, with byte offsets into the template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected closing tag '{name}' at byte {offset}")]
    UnexpectedClose { name: String, offset: usize },
    #[error("closing tag '{found}' at byte {offset} does not match '{expected}'")]
    MismatchedClose {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("tag '{name}' opened at byte {offset} is never closed")]
    Unclosed { name: String, offset: usize },
}

/// Errors raised while rendering a template
#[derive(Debug, Error)]
pub enum TagError {
    #[error("'{tag}' tag requires a 'name' attribute or an enclosing attachment")]
    MissingAttachment { tag: String },

    #[error("'{tag}' tag: no attachment named '{filename}' on this page")]
    AttachmentNotFound { tag: String, filename: String },

    #[error("'{tag}' tag can only be used with images, '{filename}' is {content_type}")]
    NotAnImage {
        tag: String,
        filename: String,
        content_type: String,
    },

    #[error("'{tag}' tag must be used inside an attachment tag")]
    NoCurrentAttachment { tag: String },

    #[error("'{tag}' tag: invalid value '{value}' for attribute '{attribute}'")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        value: String,
    },

    #[error("undefined tag '{0}'")]
    UndefinedTag(String),

    #[error("the page being rendered has not been saved")]
    UnsavedPage,

    #[error("template syntax error: {0}")]
    Parse(#[from] ParseError),

    #[error("attachment store error: {0}")]
    Store(#[from] AttachmentError),

    #[error("user store error: {0}")]
    Users(#[from] PaError),
}

impl TagError {
    /// Errors caused by how a tag was written in the template
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            TagError::MissingAttachment { .. }
                | TagError::AttachmentNotFound { .. }
                | TagError::NotAnImage { .. }
                | TagError::NoCurrentAttachment { .. }
                | TagError::InvalidAttribute { .. }
        )
    }

    pub(crate) fn invalid_attribute(tag: &str, attribute: &str, value: &str) -> Self {
        TagError::InvalidAttribute {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}

pub type TagResult<T> = Result<T, TagError>;
