//! Result type aliases

use crate::error::PaError;

/// Standard Result type for Page Attachments operations
pub type PaResult<T> = Result<T, PaError>;
