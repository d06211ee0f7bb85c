//! Tag registry
//!
//! Maps fully qualified tag names to handlers. Inside a container tag, a name
//! is first tried within the namespaces of the enclosing tags, innermost
//! first, so `<r:url />` inside `<r:attachment>` finds `attachment:url`.

use std::collections::HashMap;

use futures::future::BoxFuture;
use tracing::debug;

use crate::error::{TagError, TagResult};
use crate::tag::Tag;

pub type TagFuture<'a> = BoxFuture<'a, TagResult<String>>;

/// A tag handler
pub type TagFn = for<'a> fn(&'a Tag<'a>) -> TagFuture<'a>;

/// Documentation for a registered tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDefinition {
    pub name: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
}

impl TagDefinition {
    pub const fn new(name: &'static str, summary: &'static str, usage: &'static str) -> Self {
        Self {
            name,
            summary,
            usage,
        }
    }
}

struct RegisteredTag {
    definition: TagDefinition,
    handler: TagFn,
}

#[derive(Default)]
pub struct TagRegistry {
    tags: HashMap<&'static str, RegisteredTag>,
}

impl TagRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every attachment tag
    pub fn with_attachment_tags() -> Self {
        let mut registry = Self::new();
        crate::tags::register(&mut registry);
        registry
    }

    /// Register a handler, replacing any tag of the same name
    pub fn define(&mut self, definition: TagDefinition, handler: TagFn) -> &mut Self {
        let name = definition.name;
        if self
            .tags
            .insert(name, RegisteredTag { definition, handler })
            .is_some()
        {
            debug!(tag = name, "Tag redefined");
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Definitions sorted by name
    pub fn definitions(&self) -> Vec<&TagDefinition> {
        let mut definitions: Vec<_> = self.tags.values().map(|t| &t.definition).collect();
        definitions.sort_by_key(|d| d.name);
        definitions
    }

    /// Markdown reference of every registered tag
    pub fn documentation(&self) -> String {
        self.definitions()
            .into_iter()
            .map(|d| format!("### {}\n\n{}\n\n    {}\n", d.name, d.summary, d.usage))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Find the handler for `name` as written inside the `enclosing` tags
    pub fn resolve(&self, name: &str, enclosing: &[String]) -> TagResult<(&'static str, TagFn)> {
        for outer in enclosing.iter().rev() {
            let segments: Vec<&str> = outer.split(':').collect();
            for depth in (1..=segments.len()).rev() {
                let candidate = format!("{}:{}", segments[..depth].join(":"), name);
                if let Some(tag) = self.tags.get(candidate.as_str()) {
                    return Ok((tag.definition.name, tag.handler));
                }
            }
        }
        self.tags
            .get(name)
            .map(|tag| (tag.definition.name, tag.handler))
            .ok_or_else(|| TagError::UndefinedTag(name.to_string()))
    }
}
