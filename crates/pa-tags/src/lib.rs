//! # pa-tags
//!
//! Template tags that render a page's attachments.
//!
//! Templates use a small namespaced tag syntax:
//!
//! ```text
//! <r:attachment:each extensions="png|jpg" by="title">
//!   <r:link><r:short_title length="20" /></r:link> (<r:size units="kilobytes" /> KB)
//! </r:attachment:each>
//! ```
//!
//! A [`Renderer`] parses the template, looks every tag up in its
//! [`TagRegistry`] and calls the handler with a [`Tag`] describing the
//! attributes, the nested body and the [`RenderContext`] (current page and,
//! inside attachment-scoped tags, the current attachment).
//!
//! ## Example
//!
//! ```rust,ignore
//! let renderer = Renderer::new(services);
//! let html = renderer
//!     .render(r#"<r:attachment:image name="logo.png" alt="Logo" />"#, page)
//!     .await?;
//! ```

pub mod context;
pub mod error;
pub mod markup;
pub mod parser;
pub mod registry;
pub mod renderer;
pub mod tag;
pub mod tags;

pub use context::RenderContext;
pub use error::{ParseError, TagError, TagResult};
pub use parser::{parse, Attributes, Node, TagNode};
pub use registry::{TagDefinition, TagFn, TagFuture, TagRegistry};
pub use renderer::{Renderer, TagServices};
pub use tag::Tag;
