//! The view of a template tag handed to its handler

use std::sync::Arc;

use pa_attachments::Attachment;

use crate::context::RenderContext;
use crate::error::TagResult;
use crate::parser::{Attributes, Node};
use crate::renderer::{Renderer, TagServices};

pub struct Tag<'a> {
    name: &'a str,
    attrs: &'a Attributes,
    body: Option<&'a [Node]>,
    context: &'a RenderContext,
    renderer: &'a Renderer,
}

impl<'a> Tag<'a> {
    pub(crate) fn new(
        name: &'a str,
        attrs: &'a Attributes,
        body: Option<&'a [Node]>,
        context: &'a RenderContext,
        renderer: &'a Renderer,
    ) -> Self {
        Self {
            name,
            attrs,
            body,
            context,
            renderer,
        }
    }

    /// Fully qualified tag name, e.g. `attachment:url`
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn attr(&self, key: &str) -> Option<&'a str> {
        self.attrs.get(key)
    }

    pub fn attrs(&self) -> &'a Attributes {
        self.attrs
    }

    pub fn context(&self) -> &'a RenderContext {
        self.context
    }

    pub fn renderer(&self) -> &'a Renderer {
        self.renderer
    }

    pub fn services(&self) -> &'a TagServices {
        self.renderer.services()
    }

    /// Whether the tag was written with a body
    pub fn is_container(&self) -> bool {
        self.body.is_some()
    }

    /// Context for this tag's body
    pub fn child_context(&self) -> RenderContext {
        self.context.entering(self.name)
    }

    /// Render the body in the inherited context
    pub async fn expand(&self) -> TagResult<String> {
        let ctx = self.child_context();
        self.expand_in(&ctx).await
    }

    /// Render the body with `attachment` as the current attachment
    pub async fn expand_with(&self, attachment: Option<Arc<Attachment>>) -> TagResult<String> {
        let ctx = self.child_context().with_attachment(attachment);
        self.expand_in(&ctx).await
    }

    /// Render the body in `ctx`, which should come from [`Tag::child_context`]
    pub async fn expand_in(&self, ctx: &RenderContext) -> TagResult<String> {
        match self.body {
            Some(body) => self.renderer.render_nodes(body, ctx).await,
            None => Ok(String::new()),
        }
    }
}
