//! User model
//!
//! Table: users

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pa_core::error::{PaError, ValidationErrors};
use pa_core::result::PaResult;
use pa_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::instrument;
use validator::Validate;

/// A user who creates or updates attachments
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Option<Id>,

    /// Login name (unique)
    #[validate(length(min = 1, max = 40))]
    pub login: String,

    /// Full display name
    #[validate(length(max = 100))]
    #[serde(default)]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(id: Id, login: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            login: login.into(),
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Name shown in rendered pages; falls back to the login
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.login
        } else {
            &self.name
        }
    }

    /// Run field validations, collecting messages per field
    pub fn check(&self) -> PaResult<()> {
        self.validate()
            .map_err(|e| PaError::Validation(ValidationErrors::from(e)))
    }
}

impl Identifiable for User {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Entity for User {
    const TABLE_NAME: &'static str = "users";
    const TYPE_NAME: &'static str = "User";
}

/// User lookup used to resolve attachment authors
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by ID
    async fn find(&self, id: Id) -> PaResult<Option<User>>;
}

/// In-memory user store for testing and fixtures
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    pub async fn insert(&self, user: User) -> PaResult<()> {
        user.check()?;
        self.users.write().await.push(user);
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    #[instrument(skip(self))]
    async fn find(&self, id: Id) -> PaResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == Some(id)).cloned())
    }
}
