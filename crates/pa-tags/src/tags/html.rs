//! Tags that render HTML elements for an attachment

use crate::markup::{anchor, escape_html, img};
use crate::parser::{Attributes, Node, TagNode};
use crate::registry::{TagFuture, TagRegistry};
use crate::tag::Tag;

use super::{define, find_attachment, find_image, public_url};

const IMAGE_OWN_ATTRS: &[&str] = &["name", "size"];
const LINK_OWN_ATTRS: &[&str] = &["name", "size", "label"];

pub(super) fn register(registry: &mut TagRegistry) {
    define(
        registry,
        "attachment:image",
        "Renders an img element for an image attachment. Other attributes are \
         copied onto the element.",
        r#"<r:attachment:image [name="file.png"] [size="thumb"] [alt="..."] />"#,
        image,
    );
    define(
        registry,
        "attachment:link",
        "Renders a link to the attachment. The link text is the tag's contents, \
         the label attribute or the filename.",
        r#"<r:attachment:link [name="file.pdf"] [size="normal"] [label="..."]>...</r:attachment:link>"#,
        link,
    );
    define(
        registry,
        "attachment:lightboxthumb",
        "Renders a thumbnail of an image attachment linked to its normal size for \
         lightbox scripts. The alt attribute goes on the thumbnail; other \
         attributes are copied onto the link.",
        r#"<r:attachment:lightboxthumb [name="file.png"] [alt="..."] [rel="lightbox"] [class="lightbox-link"] [title="..."] />"#,
        lightboxthumb,
    );
}

fn image<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let attachment = find_image(tag).await?;
        let src = public_url(tag, &attachment, tag.attr("size"))
            .await
            .unwrap_or_default();
        let attrs = tag.attrs().without(IMAGE_OWN_ATTRS);
        Ok(img(&src, attrs.iter()))
    })
}

fn link<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let attachment = find_attachment(tag).await?;
        let href = public_url(tag, &attachment, tag.attr("size"))
            .await
            .unwrap_or_default();
        let text = if tag.is_container() {
            tag.expand_with(Some(attachment.clone())).await?
        } else {
            tag.attr("label")
                .map(str::to_string)
                .unwrap_or_else(|| attachment.filename.clone())
        };
        let attrs = tag.attrs().without(LINK_OWN_ATTRS);
        Ok(anchor(&href, attrs.iter(), &text))
    })
}

fn lightboxthumb<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let attachment = find_image(tag).await?;

        let mut link_attrs = tag.attrs().without(&["name", "alt"]);
        link_attrs.set("size", "normal");
        link_attrs.set_default("rel", "lightbox");
        link_attrs.set_default("class", "lightbox-link");
        link_attrs.set_default("title", escape_html(attachment.title_or_empty()));

        let mut thumbnail: Attributes = [("size", "thumb")].into_iter().collect();
        if let Some(alt) = tag.attr("alt") {
            thumbnail.set("alt", alt);
        }
        let nodes = [Node::Tag(TagNode::container(
            "attachment:link",
            link_attrs,
            vec![Node::Tag(TagNode::single("attachment:image", thumbnail))],
        ))];
        let ctx = tag.context().with_attachment(Some(attachment));
        tag.renderer().render_nodes(&nodes, &ctx).await
    })
}
