//! Query Filters
//!
//! Each filter is a condition on one string attribute of a record. A
//! [`FilterSet`] combines filters with AND semantics; the values inside a
//! single filter are alternatives (OR).

/// Filter operators that can be applied to values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    StartsWith,
    EndsWith,
}

impl FilterOperator {
    /// Apply the operator to a single candidate value (case-sensitive)
    pub fn test(&self, actual: &str, expected: &str) -> bool {
        match self {
            Self::StartsWith => actual.starts_with(expected),
            Self::EndsWith => actual.ends_with(expected),
        }
    }
}

/// Records that expose string attributes to filters
pub trait Filterable {
    fn filter_value(&self, attribute: &str) -> Option<&str>;
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// The attribute being filtered (e.g., "filename")
    pub attribute: String,
    /// The operator to apply
    pub operator: FilterOperator,
    /// Alternative values; any one may match
    pub values: Vec<String>,
}

impl Filter {
    /// Create a new filter
    pub fn new(attribute: impl Into<String>, operator: FilterOperator, values: Vec<String>) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
            values,
        }
    }

    /// Create a starts-with filter
    pub fn starts_with(attribute: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::new(attribute, FilterOperator::StartsWith, vec![prefix.into()])
    }

    /// Create an ends-with filter matching any of the suffixes
    pub fn ends_with_any(attribute: impl Into<String>, suffixes: Vec<String>) -> Self {
        Self::new(attribute, FilterOperator::EndsWith, suffixes)
    }

    /// Test a raw attribute value against this filter
    pub fn matches_value(&self, actual: &str) -> bool {
        self.values
            .iter()
            .any(|expected| self.operator.test(actual, expected))
    }

    /// Test a record against this filter; a missing attribute never matches
    pub fn matches<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        record
            .filter_value(&self.attribute)
            .map(|actual| self.matches_value(actual))
            .unwrap_or(false)
    }
}

/// Known filter attributes for attachments
pub mod attributes {
    pub const FILENAME: &str = "filename";
    pub const CONTENT_TYPE: &str = "content_type";
    pub const TITLE: &str = "title";
}

/// Filter set - a collection of filters with AND semantics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    /// Create a new empty filter set
    pub fn new() -> Self {
        Self { filters: vec![] }
    }

    /// Add a filter to the set
    pub fn add(&mut self, filter: Filter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Add a filter and return self (builder pattern)
    pub fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Check if any filters are set
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Test a record against every filter
    pub fn matches<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Test a single attribute value against the filters on that attribute
    pub fn matches_value(&self, attribute: &str, actual: &str) -> bool {
        self.filters
            .iter()
            .filter(|f| f.attribute == attribute)
            .all(|f| f.matches_value(actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Filterable for Named {
        fn filter_value(&self, attribute: &str) -> Option<&str> {
            (attribute == attributes::FILENAME).then_some(self.0)
        }
    }

    #[test]
    fn test_ends_with_any() {
        let filter = Filter::ends_with_any("filename", vec![".png".into(), ".pdf".into()]);
        assert!(filter.matches(&Named("cover.png")));
        assert!(filter.matches(&Named("report.pdf")));
        assert!(!filter.matches(&Named("notes.txt")));
        // case-sensitive
        assert!(!filter.matches(&Named("COVER.PNG")));
    }

    #[test]
    fn test_filter_on_missing_attribute_never_matches() {
        let filter = Filter::starts_with("title", "Cover");
        assert!(!filter.matches(&Named("Cover")));
    }

    #[test]
    fn test_filter_set_and_semantics() {
        let filters = FilterSet::new()
            .with(Filter::starts_with("filename", "img_"))
            .with(Filter::ends_with_any("filename", vec![".png".into()]));

        assert!(filters.matches(&Named("img_cover.png")));
        assert!(!filters.matches(&Named("cover.png")));
        assert!(!filters.matches(&Named("img_cover.jpg")));
        assert!(filters.matches_value("title", "anything"));
    }

    #[test]
    fn test_empty_filter_set_matches_everything() {
        let filters = FilterSet::new();
        assert!(filters.is_empty());
        assert!(filters.matches(&Named("anything.bin")));
    }

    #[test]
    fn test_no_alternatives_match_nothing() {
        let filter = Filter::ends_with_any("filename", vec![]);
        assert!(!filter.matches(&Named("cover.png")));
    }
}
