//! Attachment Model
//!
//! Table: page_attachments

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use pa_core::traits::{Entity, Id, Identifiable, PageScoped};
use pa_queries::filters::{attributes, Filterable};
use pa_queries::sorts::{SortField, SortKey, Sortable};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default maximum length for the `short_*` helpers
pub const DEFAULT_TRUNCATE_LENGTH: usize = 15;

/// Default suffix appended by the `short_*` helpers
pub const DEFAULT_TRUNCATE_SUFFIX: &str = " ...";

/// A file attached to a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub id: Option<Id>,
    /// Owning page
    #[serde(default)]
    pub page_id: Option<Id>,
    /// Original filename
    pub filename: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// MIME content type; guessed from the filename when blank
    #[serde(default)]
    pub content_type: String,
    /// File size in bytes
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    /// Position within the page, 1-based
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by_id: Option<Id>,
    #[serde(default)]
    pub updated_by_id: Option<Id>,
}

impl Attachment {
    /// Create a new attachment on a page
    pub fn new(page_id: Id, filename: impl Into<String>, size: i64) -> Self {
        let filename = filename.into();
        let now = Utc::now();
        Self {
            id: None,
            page_id: Some(page_id),
            content_type: guess_content_type(&filename),
            filename,
            title: None,
            description: None,
            size,
            width: None,
            height: None,
            position: None,
            created_at: now,
            updated_at: now,
            created_by_id: None,
            updated_by_id: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_dimensions(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn created_by(mut self, user_id: Id) -> Self {
        self.created_by_id = Some(user_id);
        self.updated_by_id = Some(user_id);
        self
    }

    pub fn created_on(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.updated_at = at;
        self
    }

    /// Fill a blank content type from the filename extension
    pub fn ensure_content_type(&mut self) {
        if self.content_type.trim().is_empty() {
            self.content_type = guess_content_type(&self.filename);
        }
    }

    /// Check if this is an image
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Text after the last dot of the filename
    pub fn extension(&self) -> Option<&str> {
        self.filename.rfind('.').map(|i| &self.filename[i + 1..])
    }

    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn short_title(&self, length: usize, suffix: &str) -> String {
        truncate(self.title_or_empty(), length, suffix)
    }

    pub fn short_description(&self, length: usize, suffix: &str) -> String {
        truncate(self.description_or_empty(), length, suffix)
    }

    pub fn short_filename(&self, length: usize, suffix: &str) -> String {
        truncate(&self.filename, length, suffix)
    }
}

/// Shorten `source` to at most `length` characters, ending in `suffix`.
///
/// Strings that already fit are returned unchanged. When `length` is shorter
/// than the suffix no source characters are kept and the suffix alone is
/// returned.
pub fn truncate(source: &str, length: usize, suffix: &str) -> String {
    if source.chars().count() <= length {
        return source.to_string();
    }
    let keep = length.saturating_sub(suffix.chars().count());
    let mut out: String = source.chars().take(keep).collect();
    out.push_str(suffix);
    out
}

static EXTENSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\w+$").expect("valid extension regex"));

/// Filename of a size variant: `photo.jpg` + `thumb` -> `photo_thumb.jpg`
pub fn thumbnail_filename(filename: &str, variant: &str) -> String {
    match EXTENSION_RE.find(filename) {
        Some(ext) => format!("{}_{}{}", &filename[..ext.start()], variant, ext.as_str()),
        None => format!("{}_{}", filename, variant),
    }
}

fn guess_content_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}

impl Identifiable for Attachment {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl PageScoped for Attachment {
    fn page_id(&self) -> Option<Id> {
        self.page_id
    }
}

impl Entity for Attachment {
    const TABLE_NAME: &'static str = "page_attachments";
    const TYPE_NAME: &'static str = "Attachment";
}

impl Filterable for Attachment {
    fn filter_value(&self, attribute: &str) -> Option<&str> {
        match attribute {
            attributes::FILENAME => Some(&self.filename),
            attributes::CONTENT_TYPE => Some(&self.content_type),
            attributes::TITLE => self.title.as_deref(),
            _ => None,
        }
    }
}

impl Sortable for Attachment {
    fn sort_key(&self, field: SortField) -> SortKey {
        match field {
            SortField::Id => self.id.into(),
            SortField::Position => self.position.map(i64::from).into(),
            SortField::Filename => Some(self.filename.as_str()).into(),
            SortField::Title => self.title.as_deref().into(),
            SortField::Description => self.description.as_deref().into(),
            SortField::ContentType => Some(self.content_type.as_str()).into(),
            SortField::Size => SortKey::Int(self.size),
            SortField::Width => self.width.map(i64::from).into(),
            SortField::Height => self.height.map(i64::from).into(),
            SortField::CreatedAt => SortKey::Int(self.created_at.timestamp_millis()),
            SortField::UpdatedAt => SortKey::Int(self.updated_at.timestamp_millis()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pa_queries::FindOptions;

    #[test]
    fn test_attachment_creation() {
        let attachment = Attachment::new(1, "report.pdf", 1024 * 1024)
            .with_title("Annual report");

        assert_eq!(attachment.filename, "report.pdf");
        assert_eq!(attachment.content_type, "application/pdf");
        assert!(!attachment.is_image());
        assert!(!attachment.is_persisted());
        assert_eq!(attachment.page_id(), Some(1));
    }

    #[test]
    fn test_is_image() {
        let png = Attachment::new(1, "logo.png", 10);
        assert!(png.is_image());

        let relabeled = Attachment::new(1, "logo.png", 10).with_content_type("application/pdf");
        assert!(!relabeled.is_image());
    }

    #[test]
    fn test_ensure_content_type() {
        let mut attachment = Attachment::new(1, "photo.jpg", 10).with_content_type("");
        attachment.ensure_content_type();
        assert_eq!(attachment.content_type, "image/jpeg");

        let mut unknown = Attachment::new(1, "data.zzzunknown", 10).with_content_type(" ");
        unknown.ensure_content_type();
        assert_eq!(unknown.content_type, "application/octet-stream");
    }

    #[test]
    fn test_extension() {
        assert_eq!(Attachment::new(1, "report.pdf", 1).extension(), Some("pdf"));
        assert_eq!(Attachment::new(1, "archive.tar.gz", 1).extension(), Some("gz"));
        assert_eq!(Attachment::new(1, "README", 1).extension(), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Quarterly Report Final", 15, " ..."), "Quarterly R ...");
        assert_eq!(truncate("Quarterly Report Final", 15, " ...").chars().count(), 15);
        assert_eq!(truncate("Short", 15, " ..."), "Short");
        assert_eq!(truncate("Exactly fifteen", 15, " ..."), "Exactly fifteen");
        assert_eq!(truncate("abcdef", 4, ""), "abcd");
    }

    #[test]
    fn test_truncate_length_shorter_than_suffix() {
        assert_eq!(truncate("A long title", 2, " ..."), " ...");
        assert_eq!(truncate("A long title", 0, "~"), "~");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("Überraschungsgäste", 8, "…"), "Überras…");
        assert_eq!(truncate("日本語のファイル名", 5, "..."), "日本...");
    }

    #[test]
    fn test_short_helpers() {
        let attachment = Attachment::new(1, "quarterly_report_final.pdf", 1)
            .with_title("Quarterly Report Final");

        assert_eq!(attachment.short_title(15, " ..."), "Quarterly R ...");
        assert_eq!(attachment.short_description(15, " ..."), "");
        assert_eq!(attachment.short_filename(10, "~"), "quarterly~");
    }

    #[test]
    fn test_thumbnail_filename() {
        assert_eq!(thumbnail_filename("photo.jpg", "thumb"), "photo_thumb.jpg");
        assert_eq!(thumbnail_filename("archive.tar.gz", "icon"), "archive.tar_icon.gz");
        assert_eq!(thumbnail_filename("README", "icon"), "README_icon");
    }

    #[test]
    fn test_find_options_over_attachments() {
        let attachments = vec![
            Attachment::new(1, "img_b.png", 1).with_position(2),
            Attachment::new(1, "img_a.pdf", 1).with_position(1),
            Attachment::new(1, "notes.txt", 1).with_position(3),
        ];
        let options = FindOptions::builder().extensions("png|pdf").build();
        let found: Vec<_> = options
            .apply(attachments)
            .into_iter()
            .map(|a| a.filename)
            .collect();
        assert_eq!(found, vec!["img_a.pdf", "img_b.png"]);
    }

    #[test]
    fn test_deserialize_fixture_defaults() {
        let attachment: Attachment =
            serde_json::from_str(r#"{"filename": "logo.png", "size": 42}"#).unwrap();
        assert_eq!(attachment.id, None);
        assert_eq!(attachment.content_type, "");
        assert_eq!(attachment.size, 42);
    }
}
