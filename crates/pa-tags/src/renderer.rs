//! Template renderer

use std::sync::Arc;

use futures::future::BoxFuture;
use pa_attachments::{AttachmentStore, PublicFilenames};
use pa_models::{Page, UserStore};
use tracing::{debug, instrument};

use crate::context::RenderContext;
use crate::error::TagResult;
use crate::parser::{parse, Node, TagNode};
use crate::registry::TagRegistry;
use crate::tag::Tag;

/// Collaborators the tags read from
#[derive(Clone)]
pub struct TagServices {
    pub attachments: Arc<dyn AttachmentStore>,
    pub users: Arc<dyn UserStore>,
    pub files: PublicFilenames,
}

impl TagServices {
    pub fn new(
        attachments: Arc<dyn AttachmentStore>,
        users: Arc<dyn UserStore>,
        files: PublicFilenames,
    ) -> Self {
        Self {
            attachments,
            users,
            files,
        }
    }
}

pub struct Renderer {
    registry: TagRegistry,
    services: TagServices,
}

impl Renderer {
    /// Renderer with every attachment tag registered
    pub fn new(services: TagServices) -> Self {
        Self::with_registry(TagRegistry::with_attachment_tags(), services)
    }

    pub fn with_registry(registry: TagRegistry, services: TagServices) -> Self {
        Self { registry, services }
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn services(&self) -> &TagServices {
        &self.services
    }

    /// Render a template for a page
    #[instrument(skip(self, template, page), fields(page_id = ?page.id))]
    pub async fn render(&self, template: &str, page: Page) -> TagResult<String> {
        let nodes = parse(template)?;
        let ctx = RenderContext::new(page);
        let output = self.render_nodes(&nodes, &ctx).await?;
        debug!(bytes = output.len(), "Template rendered");
        Ok(output)
    }

    /// Render parsed nodes in order, concatenating their output
    pub fn render_nodes<'a>(
        &'a self,
        nodes: &'a [Node],
        ctx: &'a RenderContext,
    ) -> BoxFuture<'a, TagResult<String>> {
        Box::pin(async move {
            let mut output = String::new();
            for node in nodes {
                match node {
                    Node::Text(text) => output.push_str(text),
                    Node::Tag(tag) => output.push_str(&self.render_tag(tag, ctx).await?),
                }
            }
            Ok(output)
        })
    }

    async fn render_tag(&self, node: &TagNode, ctx: &RenderContext) -> TagResult<String> {
        let (name, handler) = self.registry.resolve(&node.name, ctx.enclosing())?;
        let tag = Tag::new(name, &node.attrs, node.body.as_deref(), ctx, self);
        handler(&tag).await
    }
}
