//! Template parser
//!
//! Tags are written `<r:name attr="value" />` or
//! `<r:name attr='value'>...</r:name>`; everything else is literal text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;

/// Namespace prefix marking template tags
pub const TAG_PREFIX: &str = "r";

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"<(/)?{}:([\w:-]+)((?:\s+[\w:-]+\s*=\s*(?:"[^"]*"|'[^']*'))*)\s*(/)?>"#,
        TAG_PREFIX
    ))
    .expect("valid tag regex")
});

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([\w:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid attribute regex")
});

/// Tag attributes in the order they were written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set a value, keeping the original position of an existing key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Set a value only when the key is absent
    pub fn set_default(&mut self, key: &str, value: impl Into<String>) {
        if !self.contains(key) {
            self.0.push((key.to_string(), value.into()));
        }
    }

    /// Copy of these attributes without the given keys
    pub fn without(&self, keys: &[&str]) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .cloned()
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (key, value) in iter {
            attrs.set(key, value);
        }
        attrs
    }
}

/// A tag in a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    pub name: String,
    pub attrs: Attributes,
    /// Nested content; `None` for self-closing tags
    pub body: Option<Vec<Node>>,
}

impl TagNode {
    pub fn single(name: impl Into<String>, attrs: Attributes) -> Self {
        Self {
            name: name.into(),
            attrs,
            body: None,
        }
    }

    pub fn container(name: impl Into<String>, attrs: Attributes, body: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            attrs,
            body: Some(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Tag(TagNode),
}

struct OpenTag {
    name: String,
    attrs: Attributes,
    offset: usize,
    children: Vec<Node>,
}

fn push_text(target: &mut Vec<Node>, text: &str) {
    if !text.is_empty() {
        target.push(Node::Text(text.to_string()));
    }
}

fn parse_attributes(source: &str) -> Attributes {
    ATTR_RE
        .captures_iter(source)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str();
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            Some((key, value))
        })
        .collect()
}

/// Parse a template into a tree of text and tag nodes
pub fn parse(template: &str) -> Result<Vec<Node>, ParseError> {
    let mut root = Vec::new();
    let mut stack: Vec<OpenTag> = Vec::new();
    let mut cursor = 0;

    for caps in TAG_RE.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        let name = caps.get(2).map_or("", |m| m.as_str()).to_string();
        let closing = caps.get(1).is_some();
        let self_closing = caps.get(4).is_some();

        let target = match stack.last_mut() {
            Some(open) => &mut open.children,
            None => &mut root,
        };
        push_text(target, &template[cursor..whole.start()]);
        cursor = whole.end();

        if closing {
            let open = stack.pop().ok_or_else(|| ParseError::UnexpectedClose {
                name: name.clone(),
                offset: whole.start(),
            })?;
            if open.name != name {
                return Err(ParseError::MismatchedClose {
                    expected: open.name,
                    found: name,
                    offset: whole.start(),
                });
            }
            let node = Node::Tag(TagNode::container(open.name, open.attrs, open.children));
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => root.push(node),
            }
            continue;
        }

        let attrs = parse_attributes(caps.get(3).map_or("", |m| m.as_str()));
        if self_closing {
            target.push(Node::Tag(TagNode::single(name, attrs)));
        } else {
            stack.push(OpenTag {
                name,
                attrs,
                offset: whole.start(),
                children: Vec::new(),
            });
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::Unclosed {
            name: open.name,
            offset: open.offset,
        });
    }
    push_text(&mut root, &template[cursor..]);
    Ok(root)
}
