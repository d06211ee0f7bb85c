//! Attachment tags
//!
//! Every attachment-scoped tag finds its attachment the same way: a `name`
//! attribute names a file on the current page, otherwise the attachment set by
//! an enclosing tag is used.

mod fields;
mod html;
mod scope;

use std::sync::Arc;

use pa_attachments::Attachment;
use tracing::debug;

use crate::error::{TagError, TagResult};
use crate::registry::{TagDefinition, TagRegistry};
use crate::tag::Tag;

/// Register every attachment tag
pub fn register(registry: &mut TagRegistry) {
    scope::register(registry);
    fields::register(registry);
    html::register(registry);
}

/// The attachment named by `name`, else the current one
pub(crate) async fn find_attachment(tag: &Tag<'_>) -> TagResult<Arc<Attachment>> {
    if let Some(filename) = tag.attr("name") {
        let page_id = tag.context().page_id()?;
        return tag
            .services()
            .attachments
            .find_by_filename(page_id, filename)
            .await?
            .map(Arc::new)
            .ok_or_else(|| TagError::AttachmentNotFound {
                tag: tag.name().to_string(),
                filename: filename.to_string(),
            });
    }
    tag.context()
        .attachment()
        .cloned()
        .ok_or_else(|| TagError::MissingAttachment {
            tag: tag.name().to_string(),
        })
}

/// Like [`find_attachment`], but only images are accepted
pub(crate) async fn find_image(tag: &Tag<'_>) -> TagResult<Arc<Attachment>> {
    let attachment = find_attachment(tag).await?;
    if !attachment.is_image() {
        return Err(TagError::NotAnImage {
            tag: tag.name().to_string(),
            filename: attachment.filename.clone(),
            content_type: attachment.content_type.clone(),
        });
    }
    Ok(attachment)
}

/// Public URL of an attachment, `None` when it cannot be derived
pub(crate) async fn public_url(
    tag: &Tag<'_>,
    attachment: &Attachment,
    variant: Option<&str>,
) -> Option<String> {
    match tag.services().files.public_filename(attachment, variant).await {
        Ok(url) => Some(url),
        Err(e) => {
            debug!(
                tag = tag.name(),
                filename = %attachment.filename,
                variant = ?variant,
                error = %e,
                "No public filename"
            );
            None
        }
    }
}

pub(crate) fn define(
    registry: &mut TagRegistry,
    name: &'static str,
    summary: &'static str,
    usage: &'static str,
    handler: crate::registry::TagFn,
) {
    registry.define(TagDefinition::new(name, summary, usage), handler);
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use pa_attachments::{Attachment, LocalStorage, MemoryAttachmentStore, PublicFilenames};
    use pa_core::config::ThumbnailConfig;
    use pa_models::{MemoryUserStore, Page, User};

    use crate::error::TagResult;
    use crate::renderer::{Renderer, TagServices};

    /// Renderer over a page (id 1) holding `logo.png`, `report.pdf` and
    /// `notes.txt`, created by user 7
    pub async fn renderer() -> Renderer {
        let store = MemoryAttachmentStore::new();
        let created = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap();
        let fixtures = [
            Attachment::new(1, "logo.png", 2048)
                .with_title("Company Logo")
                .with_description("Our shiny corporate logo")
                .with_dimensions(120, 80),
            Attachment::new(1, "report.pdf", 3 * 1024 * 1024).with_title("Annual Report 2023"),
            Attachment::new(1, "notes.txt", 10),
        ];
        for attachment in fixtures {
            store
                .insert(attachment.created_by(7).created_on(created))
                .await
                .unwrap();
        }
        store.insert(Attachment::new(2, "elsewhere.png", 1)).await.unwrap();

        let users = MemoryUserStore::with_users(vec![User::new(
            7,
            "jdoe",
            "Jane Doe",
            "jane@example.com",
        )]);

        let files = PublicFilenames::new(
            Arc::new(LocalStorage::new("/files")),
            ThumbnailConfig::default(),
        );
        Renderer::new(TagServices::new(Arc::new(store), Arc::new(users), files))
    }

    pub async fn render(template: &str) -> TagResult<String> {
        renderer()
            .await
            .render(template, Page::new(1, "Home", "home"))
            .await
    }
}
