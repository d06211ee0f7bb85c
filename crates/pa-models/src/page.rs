//! Page model
//!
//! Table: pages

use chrono::{DateTime, Utc};
use pa_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};

/// A published page that owns attachments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: Option<Id>,
    pub title: String,
    pub slug: String,
    pub parent_id: Option<Id>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Page {
    pub fn new(id: Id, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
            slug: slug.into(),
            parent_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_parent(mut self, parent_id: Id) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Identifiable for Page {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Entity for Page {
    const TABLE_NAME: &'static str = "pages";
    const TYPE_NAME: &'static str = "Page";
}
