//! Tags that choose which attachment their body renders with

use std::sync::Arc;

use pa_queries::FindOptions;
use tracing::{debug, warn};

use super::define;
use crate::error::{TagError, TagResult};
use crate::registry::{TagFuture, TagRegistry};
use crate::tag::Tag;

pub(super) fn register(registry: &mut TagRegistry) {
    define(
        registry,
        "attachment",
        "Renders its contents with the named attachment as the current attachment. \
         When no attachment has that name the contents render without one.",
        r#"<r:attachment name="file.png">...</r:attachment>"#,
        attachment,
    );
    define(
        registry,
        "attachment:each",
        "Renders its contents once for every matching attachment of the page.",
        r#"<r:attachment:each [extensions="png|jpg"] [name_prefix="img_"] [by="position"] [order="asc|desc"] [limit="n"] [offset="n"]>...</r:attachment:each>"#,
        each,
    );
    define(
        registry,
        "if_attachments",
        "Renders its contents when the page has at least min_count matching attachments.",
        r#"<r:if_attachments [min_count="n"] [extensions="..."] [name_prefix="..."]>...</r:if_attachments>"#,
        if_attachments,
    );
    define(
        registry,
        "unless_attachments",
        "Renders its contents when the page has no matching attachments.",
        r#"<r:unless_attachments [extensions="..."] [name_prefix="..."]>...</r:unless_attachments>"#,
        unless_attachments,
    );
}

fn attachment<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let Some(filename) = tag.attr("name") else {
            return tag.expand().await;
        };

        let page_id = tag.context().page_id()?;
        let found = match tag
            .services()
            .attachments
            .find_by_filename(page_id, filename)
            .await
        {
            Ok(Some(found)) => Some(Arc::new(found)),
            Ok(None) => {
                debug!(page_id, filename, "Attachment not found, rendering without one");
                None
            }
            Err(e) => {
                warn!(page_id, filename, error = %e, "Attachment lookup failed");
                None
            }
        };
        tag.expand_with(found).await
    })
}

fn each<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let page_id = tag.context().page_id()?;
        let options = FindOptions::from_lookup(|key| tag.attr(key));
        let attachments = tag
            .services()
            .attachments
            .find_all(page_id, &options)
            .await?;

        let mut output = String::new();
        for attachment in attachments {
            output.push_str(&tag.expand_with(Some(Arc::new(attachment))).await?);
        }
        Ok(output)
    })
}

async fn matching_count(tag: &Tag<'_>) -> TagResult<usize> {
    let page_id = tag.context().page_id()?;
    let options = FindOptions::from_lookup(|key| tag.attr(key)).count_scope();
    Ok(tag.services().attachments.count(page_id, &options).await?)
}

fn if_attachments<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let min_count = match tag.attr("min_count") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| TagError::invalid_attribute(tag.name(), "min_count", value))?,
            None => 0,
        };
        if matching_count(tag).await? >= min_count {
            tag.expand().await
        } else {
            Ok(String::new())
        }
    })
}

fn unless_attachments<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        if matching_count(tag).await? == 0 {
            tag.expand().await
        } else {
            Ok(String::new())
        }
    })
}
