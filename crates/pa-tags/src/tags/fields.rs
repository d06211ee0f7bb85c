//! Tags that print a single attachment value

use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use pa_attachments::{Attachment, DEFAULT_TRUNCATE_LENGTH, DEFAULT_TRUNCATE_SUFFIX};
use tracing::debug;

use super::{define, find_attachment, public_url};
use crate::error::{TagError, TagResult};
use crate::registry::{TagFuture, TagRegistry};
use crate::tag::Tag;

const DEFAULT_DATE_FORMAT: &str = "%F";

const FIELDS: [(&str, &str); 7] = [
    ("attachment:content_type", "Renders the MIME content type of the attachment."),
    ("attachment:width", "Renders the width of an image attachment in pixels."),
    ("attachment:height", "Renders the height of an image attachment in pixels."),
    ("attachment:title", "Renders the title of the attachment."),
    ("attachment:description", "Renders the description of the attachment."),
    ("attachment:position", "Renders the position of the attachment within its page."),
    ("attachment:filename", "Renders the filename of the attachment."),
];

pub(super) fn register(registry: &mut TagRegistry) {
    define(
        registry,
        "attachment:url",
        "Renders the public URL of the attachment or of one of its sizes.",
        r#"<r:attachment:url [name="file.png"] [size="thumb"] />"#,
        url,
    );
    define(
        registry,
        "attachment:short_title",
        "Renders the title, shortened to length characters ending in suffix.",
        r#"<r:attachment:short_title [name="..."] [length="15"] [suffix=" ..."] />"#,
        short_text,
    );
    define(
        registry,
        "attachment:short_description",
        "Renders the description, shortened to length characters ending in suffix.",
        r#"<r:attachment:short_description [name="..."] [length="15"] [suffix=" ..."] />"#,
        short_text,
    );
    define(
        registry,
        "attachment:short_filename",
        "Renders the filename, shortened to length characters ending in suffix.",
        r#"<r:attachment:short_filename [name="..."] [length="15"] [suffix=" ..."] />"#,
        short_text,
    );
    define(
        registry,
        "attachment:size",
        "Renders the file size in bytes, kilobytes, megabytes, gigabytes or terabytes.",
        r#"<r:attachment:size [name="..."] [units="bytes|kilobytes|megabytes|gigabytes|terabytes"] />"#,
        size,
    );
    for (name, summary) in FIELDS {
        define(registry, name, summary, "<r:attachment:FIELD [name=\"...\"] />", field);
    }
    define(
        registry,
        "attachment:date",
        "Renders the creation date of the attachment using a strftime format.",
        r#"<r:attachment:date [name="..."] [format="%F"] />"#,
        date,
    );
    define(
        registry,
        "attachment:author",
        "Renders the name of the user who uploaded the attachment.",
        r#"<r:attachment:author [name="..."] />"#,
        author,
    );
    define(
        registry,
        "attachment:extension",
        "Renders the file extension of the current attachment.",
        "<r:attachment:extension />",
        extension,
    );
}

fn url<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let attachment = find_attachment(tag).await?;
        Ok(public_url(tag, &attachment, tag.attr("size"))
            .await
            .unwrap_or_default())
    })
}

fn short_text<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let attachment = find_attachment(tag).await?;
        let length = match tag.attr("length") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| TagError::invalid_attribute(tag.name(), "length", value))?,
            None => DEFAULT_TRUNCATE_LENGTH,
        };
        let suffix = tag.attr("suffix").unwrap_or(DEFAULT_TRUNCATE_SUFFIX);

        Ok(match tag.name() {
            "attachment:short_title" => attachment.short_title(length, suffix),
            "attachment:short_description" => attachment.short_description(length, suffix),
            _ => attachment.short_filename(length, suffix),
        })
    })
}

/// Units accepted by `attachment:size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeUnit {
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
    Terabytes,
}

impl SizeUnit {
    fn multiplier(self) -> u64 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kilobytes => 1 << 10,
            SizeUnit::Megabytes => 1 << 20,
            SizeUnit::Gigabytes => 1 << 30,
            SizeUnit::Terabytes => 1 << 40,
        }
    }

    fn format(self, bytes: i64) -> String {
        match self {
            SizeUnit::Bytes => bytes.to_string(),
            unit => format!("{:.2}", bytes as f64 / unit.multiplier() as f64),
        }
    }
}

impl FromStr for SizeUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "byte" | "bytes" => Ok(SizeUnit::Bytes),
            "kilobyte" | "kilobytes" => Ok(SizeUnit::Kilobytes),
            "megabyte" | "megabytes" => Ok(SizeUnit::Megabytes),
            "gigabyte" | "gigabytes" => Ok(SizeUnit::Gigabytes),
            "terabyte" | "terabytes" => Ok(SizeUnit::Terabytes),
            _ => Err(()),
        }
    }
}

fn size<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let attachment = find_attachment(tag).await?;
        let unit = match tag.attr("units").or_else(|| tag.attr("unit")) {
            Some(value) => value.parse().unwrap_or_else(|_| {
                debug!(units = value, "Unknown size unit, using bytes");
                SizeUnit::Bytes
            }),
            None => SizeUnit::Bytes,
        };
        Ok(unit.format(attachment.size))
    })
}

fn field_value(name: &str, attachment: &Attachment) -> String {
    fn optional<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    match name {
        "attachment:content_type" => attachment.content_type.clone(),
        "attachment:width" => optional(attachment.width),
        "attachment:height" => optional(attachment.height),
        "attachment:title" => attachment.title_or_empty().to_string(),
        "attachment:description" => attachment.description_or_empty().to_string(),
        "attachment:position" => optional(attachment.position),
        _ => attachment.filename.clone(),
    }
}

fn field<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let attachment = find_attachment(tag).await?;
        Ok(field_value(tag.name(), &attachment))
    })
}

fn date<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let attachment = find_attachment(tag).await?;
        let format = tag.attr("format").unwrap_or(DEFAULT_DATE_FORMAT);
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(TagError::invalid_attribute(tag.name(), "format", format));
        }
        Ok(attachment.created_at.format(format).to_string())
    })
}

fn author<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let attachment = find_attachment(tag).await?;
        let Some(user_id) = attachment.created_by_id else {
            return Ok(String::new());
        };
        Ok(tag
            .services()
            .users
            .find(user_id)
            .await?
            .map(|user| user.display_name().to_string())
            .unwrap_or_default())
    })
}

fn extension<'a>(tag: &'a Tag<'a>) -> TagFuture<'a> {
    Box::pin(async move {
        let attachment = current_attachment(tag)?;
        Ok(attachment.extension().unwrap_or_default().to_string())
    })
}

fn current_attachment<'a>(tag: &Tag<'a>) -> TagResult<&'a Attachment> {
    tag.context()
        .attachment()
        .map(|a| a.as_ref())
        .ok_or_else(|| TagError::NoCurrentAttachment {
            tag: tag.name().to_string(),
        })
}
