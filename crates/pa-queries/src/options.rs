//! Find Options
//!
//! Translates template tag attributes into a structured listing request.

use tracing::warn;

use crate::filters::{attributes, Filter, FilterSet, Filterable};
use crate::sorts::{default_attachment_sort, SortDirection, SortField, SortOrder, Sortable};

/// Limit applied when an offset is given without an explicit limit
pub const UNBOUNDED_LIMIT: u64 = i64::MAX as u64;

/// Attribute names read by [`FindOptions::from_lookup`]
pub mod keys {
    pub const EXTENSIONS: &str = "extensions";
    pub const NAME_PREFIX: &str = "name_prefix";
    pub const BY: &str = "by";
    pub const ORDER: &str = "order";
    pub const LIMIT: &str = "limit";
    pub const OFFSET: &str = "offset";
}

/// Filter, sort and pagination criteria for an attachment listing
#[derive(Debug, Clone, PartialEq)]
pub struct FindOptions {
    filters: FilterSet,
    order: SortOrder,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            filters: FilterSet::new(),
            order: default_attachment_sort(),
            limit: None,
            offset: None,
        }
    }
}

impl FindOptions {
    pub fn builder() -> FindOptionsBuilder {
        FindOptionsBuilder::default()
    }

    /// Build options from a string attribute lookup
    pub fn from_lookup<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut builder = Self::builder();
        if let Some(extensions) = lookup(keys::EXTENSIONS) {
            builder = builder.extensions(extensions);
        }
        if let Some(prefix) = lookup(keys::NAME_PREFIX) {
            builder = builder.name_prefix(prefix);
        }
        if let Some(by) = lookup(keys::BY) {
            builder = builder.by(by);
        }
        if let Some(order) = lookup(keys::ORDER) {
            builder = builder.order(order);
        }
        if let Some(limit) = lookup(keys::LIMIT) {
            builder = builder.limit(limit);
        }
        if let Some(offset) = lookup(keys::OFFSET) {
            builder = builder.offset(offset);
        }
        builder.build()
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn order(&self) -> &SortOrder {
        &self.order
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// The same filters without ordering or pagination, for counting
    pub fn count_scope(&self) -> FindOptions {
        FindOptions {
            filters: self.filters.clone(),
            order: SortOrder::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn matches<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        self.filters.matches(record)
    }

    /// Filter, sort and page an in-memory collection
    pub fn apply<T, I>(&self, records: I) -> Vec<T>
    where
        T: Filterable + Sortable,
        I: IntoIterator<Item = T>,
    {
        let mut matching: Vec<T> = records.into_iter().filter(|r| self.matches(r)).collect();
        self.order.sort(&mut matching);

        let offset = self
            .offset
            .map(|o| usize::try_from(o).unwrap_or(usize::MAX))
            .unwrap_or(0);
        let limit = self
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        matching.into_iter().skip(offset).take(limit).collect()
    }
}

/// Builder for [`FindOptions`] from raw attribute strings
#[derive(Debug, Default)]
pub struct FindOptionsBuilder {
    extensions: Vec<String>,
    name_prefix: Option<String>,
    by: SortField,
    direction: SortDirection,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl FindOptionsBuilder {
    /// Pipe-separated list of extensions, e.g. `png|pdf`
    pub fn extensions(mut self, extensions: &str) -> Self {
        self.extensions = extensions
            .split('|')
            .map(str::trim)
            .map(|ext| ext.trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    pub fn name_prefix(mut self, prefix: &str) -> Self {
        self.name_prefix = Some(prefix.to_string()).filter(|p| !p.is_empty());
        self
    }

    /// Sort column; unknown columns keep the default
    pub fn by(mut self, by: &str) -> Self {
        match SortField::from_str(by.trim()) {
            Some(field) => self.by = field,
            None => warn!(by = %by, "Unknown sort field, ordering by position"),
        }
        self
    }

    /// Sort direction; unknown values keep ascending
    pub fn order(mut self, order: &str) -> Self {
        match SortDirection::from_str(order.trim()) {
            Some(direction) => self.direction = direction,
            None => warn!(order = %order, "Unknown sort order, using asc"),
        }
        self
    }

    pub fn limit(mut self, limit: &str) -> Self {
        self.limit = parse_count(keys::LIMIT, limit).or(self.limit);
        self
    }

    pub fn offset(mut self, offset: &str) -> Self {
        self.offset = parse_count(keys::OFFSET, offset).or(self.offset);
        self
    }

    pub fn build(self) -> FindOptions {
        let mut filters = FilterSet::new();
        if !self.extensions.is_empty() {
            let suffixes = self.extensions.iter().map(|ext| format!(".{}", ext)).collect();
            filters.add(Filter::ends_with_any(attributes::FILENAME, suffixes));
        }
        if let Some(prefix) = self.name_prefix {
            filters.add(Filter::starts_with(attributes::FILENAME, prefix));
        }

        let limit = match (self.limit, self.offset) {
            (None, Some(_)) => Some(UNBOUNDED_LIMIT),
            (limit, _) => limit,
        };

        FindOptions {
            filters,
            order: SortOrder::by(self.by, self.direction),
            limit,
            offset: self.offset,
        }
    }
}

fn parse_count(key: &str, value: &str) -> Option<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(key = key, value = %value, "Ignoring non-numeric pagination value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorts::SortKey;
    use std::collections::HashMap;

    #[derive(Debug, Clone)]
    struct File {
        name: &'static str,
        position: i64,
    }

    impl Filterable for File {
        fn filter_value(&self, attribute: &str) -> Option<&str> {
            (attribute == attributes::FILENAME).then_some(self.name)
        }
    }

    impl Sortable for File {
        fn sort_key(&self, field: SortField) -> SortKey {
            match field {
                SortField::Position => SortKey::Int(self.position),
                SortField::Filename => SortKey::Text(self.name.to_string()),
                _ => SortKey::Null,
            }
        }
    }

    fn files() -> Vec<File> {
        ["img_cover.png", "img_doc.pdf", "cover.png", "img_notes.txt", "img_zeta.png"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| File {
                name,
                position: i as i64 + 1,
            })
            .collect()
    }

    fn options(attrs: &[(&str, &str)]) -> FindOptions {
        let map: HashMap<&str, &str> = attrs.iter().copied().collect();
        FindOptions::from_lookup(|key| map.get(key).copied())
    }

    fn names(records: Vec<File>) -> Vec<&'static str> {
        records.into_iter().map(|f| f.name).collect()
    }

    #[test]
    fn test_extensions_and_prefix() {
        let opts = options(&[("extensions", "png|pdf"), ("name_prefix", "img_")]);
        let filters = opts.filters();

        assert!(filters.matches_value("filename", "img_cover.png"));
        assert!(filters.matches_value("filename", "img_doc.pdf"));
        assert!(!filters.matches_value("filename", "cover.png"));
        assert!(!filters.matches_value("filename", "img_notes.txt"));
    }

    #[test]
    fn test_defaults() {
        let opts = options(&[]);
        assert!(opts.filters().is_empty());
        assert_eq!(opts.order(), &SortOrder::by_asc(SortField::Position));
        assert_eq!(opts.limit(), None);
        assert_eq!(opts.offset(), None);
        assert_eq!(names(opts.apply(files())).len(), 5);
    }

    #[test]
    fn test_offset_without_limit_is_unbounded() {
        let opts = options(&[("offset", "2")]);
        assert_eq!(opts.limit(), Some(UNBOUNDED_LIMIT));
        assert_eq!(opts.offset(), Some(2));
        assert_eq!(
            names(opts.apply(files())),
            vec!["cover.png", "img_notes.txt", "img_zeta.png"]
        );
    }

    #[test]
    fn test_limit_offset_and_order() {
        let opts = options(&[
            ("by", "filename"),
            ("order", "desc"),
            ("limit", "2"),
            ("offset", "1"),
        ]);
        assert_eq!(opts.limit(), Some(2));
        assert_eq!(names(opts.apply(files())), vec!["img_notes.txt", "img_doc.pdf"]);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let opts = options(&[("by", "bogus"), ("order", "up"), ("limit", "ten")]);
        assert_eq!(opts.order(), &SortOrder::by_asc(SortField::Position));
        assert_eq!(opts.limit(), None);
    }

    #[test]
    fn test_count_scope_drops_sort_and_window() {
        let opts = options(&[("extensions", "png"), ("limit", "1"), ("order", "desc")]);
        let scope = opts.count_scope();
        assert_eq!(scope.filters(), opts.filters());
        assert!(scope.order().is_empty());
        assert_eq!(scope.limit(), None);
        assert_eq!(
            names(scope.apply(files())),
            vec!["img_cover.png", "cover.png", "img_zeta.png"]
        );
    }

    #[test]
    fn test_blank_extension_entries_are_skipped() {
        let opts = options(&[("extensions", "png||.pdf ")]);
        assert_eq!(
            names(opts.apply(files())),
            vec!["img_cover.png", "img_doc.pdf", "cover.png", "img_zeta.png"]
        );
    }
}
