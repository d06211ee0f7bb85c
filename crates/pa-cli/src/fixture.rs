//! JSON fixtures loaded into the in-memory stores

use std::sync::Arc;

use anyhow::Context;
use pa_attachments::{storage_from_config, Attachment, MemoryAttachmentStore, PublicFilenames};
use pa_core::config::AppConfig;
use pa_models::{MemoryUserStore, Page, User};
use pa_tags::TagServices;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Fixture {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid fixture")
    }

    /// The page with `id`, or the first page
    pub fn page(&self, id: Option<i64>) -> anyhow::Result<Page> {
        match id {
            Some(id) => self
                .pages
                .iter()
                .find(|p| p.id == Some(id))
                .cloned()
                .with_context(|| format!("no page with id {} in fixture", id)),
            None => self.pages.first().cloned().context("fixture has no pages"),
        }
    }

    /// Load users and attachments into stores the tags can read
    pub async fn services(self, config: &AppConfig) -> anyhow::Result<TagServices> {
        let users = MemoryUserStore::new();
        for user in self.users {
            let login = user.login.clone();
            users
                .insert(user)
                .await
                .with_context(|| format!("invalid user '{}'", login))?;
        }

        let attachments = MemoryAttachmentStore::new();
        let count = self.attachments.len();
        for attachment in self.attachments {
            let filename = attachment.filename.clone();
            attachments
                .insert(attachment)
                .await
                .with_context(|| format!("invalid attachment '{}'", filename))?;
        }
        info!(attachments = count, "Fixture loaded");

        let files = PublicFilenames::new(
            storage_from_config(&config.storage),
            config.thumbnails.clone(),
        );
        Ok(TagServices::new(Arc::new(attachments), Arc::new(users), files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pa_core::config::{StorageBackend, StorageConfig};
    use pa_tags::Renderer;

    const FIXTURE: &str = r#"{
        "pages": [
            {"id": 1, "title": "Home", "slug": "home"},
            {"id": 2, "title": "Downloads", "slug": "downloads", "parent_id": 1}
        ],
        "users": [{"id": 5, "login": "admin", "name": "Site Admin", "email": "admin@example.com"}],
        "attachments": [
            {"page_id": 2, "filename": "manual.pdf", "size": 1048576, "title": "Manual", "created_by_id": 5}
        ]
    }"#;

    #[test]
    fn test_page_selection() {
        let fixture = Fixture::from_json(FIXTURE).unwrap();
        assert_eq!(fixture.page(None).unwrap().slug, "home");
        assert_eq!(fixture.page(Some(2)).unwrap().slug, "downloads");
        assert!(fixture.page(Some(9)).is_err());
        assert!(Fixture::default().page(None).is_err());
    }

    #[test]
    fn test_invalid_json() {
        assert!(Fixture::from_json("{\"pages\": 3}").is_err());
    }

    #[tokio::test]
    async fn test_render_fixture() {
        let fixture = Fixture::from_json(FIXTURE).unwrap();
        let page = fixture.page(Some(2)).unwrap();
        let config = AppConfig {
            storage: StorageConfig {
                backend: StorageBackend::Local,
                base_url: "/media".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let renderer = Renderer::new(fixture.services(&config).await.unwrap());

        let html = renderer
            .render(
                "<r:attachment:each><r:link /> by <r:author />, <r:size units=\"megabytes\" /> MB</r:attachment:each>",
                page,
            )
            .await
            .unwrap();
        assert_eq!(
            html,
            r#"<a href="/media/page_attachments/1/manual.pdf">manual.pdf</a> by Site Admin, 1.00 MB"#
        );
    }

    #[tokio::test]
    async fn test_invalid_user_rejected() {
        let fixture = Fixture::from_json(
            r#"{"users": [{"id": 1, "login": "x", "email": "not-an-email"}]}"#,
        )
        .unwrap();
        let err = fixture.services(&AppConfig::default()).await.err().unwrap();
        assert!(err.to_string().contains("invalid user 'x'"));
    }
}
