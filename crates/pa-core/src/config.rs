//! Configuration types and loading
//!
//! Covers the storage backend that produces public attachment URLs and the
//! named thumbnail size variants (`icon`, `thumb`, `normal`, ...) it knows about.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Object storage configuration
    pub storage: StorageConfig,

    /// Thumbnail size variants
    pub thumbnails: ThumbnailConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s3" => Ok(Self::S3),
            "local" | "file_system" => Ok(Self::Local),
            other => Err(ConfigError::InvalidValue {
                key: "PAGE_ATTACHMENTS_STORAGE".to_string(),
                message: format!("unknown storage backend '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub path_style: bool,
    /// Base URL used by the local backend
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            bucket: "page-attachments".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            path_style: false,
            base_url: "/page_attachments".to_string(),
        }
    }
}

/// Named thumbnail size variants, in declaration order
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ThumbnailConfig {
    pub sizes: Vec<(String, Geometry)>,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        let sizes = [("icon", "50x50>"), ("thumb", "144x144>"), ("normal", "640x640>")]
            .into_iter()
            .filter_map(|(name, geometry)| {
                geometry.parse().ok().map(|g| (name.to_string(), g))
            })
            .collect();
        Self { sizes }
    }
}

impl ThumbnailConfig {
    /// Parse a `name=geometry,name=geometry` list
    pub fn parse_list(value: &str) -> Result<Self, ConfigError> {
        let mut sizes = Vec::new();
        for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, geometry) = entry.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
                key: "PAGE_ATTACHMENT_SIZES".to_string(),
                message: format!("expected name=geometry, got '{}'", entry),
            })?;
            sizes.push((name.trim().to_string(), geometry.trim().parse()?));
        }
        Ok(Self { sizes })
    }

    pub fn get(&self, name: &str) -> Option<&Geometry> {
        self.sizes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, g)| g)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sizes.iter().map(|(n, _)| n.as_str())
    }
}

static GEOMETRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)?(?:x(\d+)?)?([><!%^@])?$").expect("valid geometry regex"));

/// An ImageMagick-style geometry string such as `144x144>` or `640x`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Geometry {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub modifier: Option<char>,
}

impl FromStr for Geometry {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidGeometry(s.to_string());
        let caps = GEOMETRY_RE.captures(s).ok_or_else(invalid)?;
        let width = caps.get(1).map(|m| m.as_str().parse()).transpose().map_err(|_| invalid())?;
        let height = caps.get(2).map(|m| m.as_str().parse()).transpose().map_err(|_| invalid())?;
        if width.is_none() && height.is_none() {
            return Err(invalid());
        }
        Ok(Self {
            width,
            height,
            modifier: caps.get(3).and_then(|m| m.as_str().chars().next()),
        })
    }
}

impl TryFrom<String> for Geometry {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Geometry> for String {
    fn from(value: Geometry) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(w) = self.width {
            write!(f, "{}", w)?;
        }
        if let Some(h) = self.height {
            write!(f, "x{}", h)?;
        }
        if let Some(m) = self.modifier {
            write!(f, "{}", m)?;
        }
        Ok(())
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, starting from the defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(backend) = lookup("PAGE_ATTACHMENTS_STORAGE") {
            config.storage.backend = backend.parse()?;
        }
        if let Some(bucket) = lookup("S3_BUCKET") {
            config.storage.bucket = bucket;
        }
        if let Some(region) = lookup("S3_REGION") {
            config.storage.region = region;
        }
        if let Some(endpoint) = lookup("S3_ENDPOINT") {
            config.storage.endpoint = Some(endpoint);
        }
        if let Some(v) = lookup("S3_PATH_STYLE") {
            config.storage.path_style = v == "true" || v == "1";
        }
        if let Some(url) = lookup("PAGE_ATTACHMENTS_BASE_URL") {
            config.storage.base_url = url;
        }

        if let Some(sizes) = lookup("PAGE_ATTACHMENT_SIZES") {
            config.thumbnails = ThumbnailConfig::parse_list(&sizes)?;
            tracing::debug!(
                sizes = ?config.thumbnails.names().collect::<Vec<_>>(),
                "Thumbnail sizes loaded from environment"
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::S3);
        assert_eq!(
            config.thumbnails.names().collect::<Vec<_>>(),
            vec!["icon", "thumb", "normal"]
        );
        assert_eq!(config.thumbnails.get("thumb").unwrap().to_string(), "144x144>");
    }

    #[test]
    fn test_geometry_parsing() {
        let g: Geometry = "144x144>".parse().unwrap();
        assert_eq!(g.width, Some(144));
        assert_eq!(g.height, Some(144));
        assert_eq!(g.modifier, Some('>'));

        let w: Geometry = "640x".parse().unwrap();
        assert_eq!(w.width, Some(640));
        assert_eq!(w.height, None);

        let h: Geometry = "x200".parse().unwrap();
        assert_eq!(h.width, None);
        assert_eq!(h.height, Some(200));

        assert!("".parse::<Geometry>().is_err());
        assert!("x".parse::<Geometry>().is_err());
        assert!("big".parse::<Geometry>().is_err());
        assert!("10x10#".parse::<Geometry>().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PAGE_ATTACHMENTS_STORAGE", "local"),
            ("PAGE_ATTACHMENTS_BASE_URL", "/files"),
            ("S3_PATH_STYLE", "1"),
            ("PAGE_ATTACHMENT_SIZES", "icon=32x32>, thumb=100x100"),
        ]))
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Local);
        assert_eq!(config.storage.base_url, "/files");
        assert!(config.storage.path_style);
        assert_eq!(config.thumbnails.sizes.len(), 2);
        assert_eq!(config.thumbnails.get("thumb").unwrap().modifier, None);
        assert!(config.thumbnails.get("normal").is_none());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let bad_backend = AppConfig::from_lookup(lookup_from(&[("PAGE_ATTACHMENTS_STORAGE", "ftp")]));
        assert!(matches!(bad_backend, Err(ConfigError::InvalidValue { .. })));

        let bad_sizes = AppConfig::from_lookup(lookup_from(&[("PAGE_ATTACHMENT_SIZES", "icon")]));
        assert!(matches!(bad_sizes, Err(ConfigError::InvalidValue { .. })));

        let bad_geometry =
            AppConfig::from_lookup(lookup_from(&[("PAGE_ATTACHMENT_SIZES", "icon=huge")]));
        assert!(matches!(bad_geometry, Err(ConfigError::InvalidGeometry(_))));
    }

    #[test]
    fn test_config_serde_roundtrip_keeps_geometry_strings() {
        let json = serde_json::to_value(AppConfig::default()).unwrap();
        assert_eq!(json["thumbnails"]["sizes"][0][1], "50x50>");
    }
}
