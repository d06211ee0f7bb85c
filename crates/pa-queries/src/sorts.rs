//! Query Sort Orders
//!
//! Sort orders define how attachment listings are ordered.

use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order (A-Z, 1-9, oldest first)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest first)
    Desc,
}

impl SortDirection {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Get the opposite direction
    pub fn reverse(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Orient an ascending comparison
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Attachment columns that listings may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortField {
    Id,
    #[default]
    Position,
    Filename,
    Title,
    Description,
    ContentType,
    Size,
    Width,
    Height,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 11] = [
        Self::Id,
        Self::Position,
        Self::Filename,
        Self::Title,
        Self::Description,
        Self::ContentType,
        Self::Size,
        Self::Width,
        Self::Height,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    /// Parse a column name
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Position => "position",
            Self::Filename => "filename",
            Self::Title => "title",
            Self::Description => "description",
            Self::ContentType => "content_type",
            Self::Size => "size",
            Self::Width => "width",
            Self::Height => "height",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// A comparable value extracted from a record for one sort field
///
/// `Null` sorts before every other key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Null,
    Int(i64),
    Text(String),
}

impl From<Option<i64>> for SortKey {
    fn from(value: Option<i64>) -> Self {
        value.map(SortKey::Int).unwrap_or(SortKey::Null)
    }
}

impl From<Option<&str>> for SortKey {
    fn from(value: Option<&str>) -> Self {
        value
            .map(|s| SortKey::Text(s.to_string()))
            .unwrap_or(SortKey::Null)
    }
}

/// Records that can be ordered by [`SortField`]s
pub trait Sortable {
    fn sort_key(&self, field: SortField) -> SortKey;
}

/// A single sort criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortCriterion {
    /// The field to sort by
    pub field: SortField,
    /// The sort direction
    pub direction: SortDirection,
}

impl SortCriterion {
    /// Create a new sort criterion
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Create ascending sort
    pub fn asc(field: SortField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Create descending sort
    pub fn desc(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Reverse the sort direction
    pub fn reversed(mut self) -> Self {
        self.direction = self.direction.reverse();
        self
    }

    /// Compare two records under this criterion
    pub fn compare<T: Sortable + ?Sized>(&self, a: &T, b: &T) -> Ordering {
        self.direction
            .apply(a.sort_key(self.field).cmp(&b.sort_key(self.field)))
    }
}

/// Collection of sort criteria, applied in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortOrder {
    criteria: Vec<SortCriterion>,
}

impl SortOrder {
    /// Create a new empty sort order
    pub fn new() -> Self {
        Self { criteria: vec![] }
    }

    /// Create with a single criterion
    pub fn by(field: SortField, direction: SortDirection) -> Self {
        Self {
            criteria: vec![SortCriterion::new(field, direction)],
        }
    }

    /// Create with ascending sort on single field
    pub fn by_asc(field: SortField) -> Self {
        Self::by(field, SortDirection::Asc)
    }

    /// Create with descending sort on single field
    pub fn by_desc(field: SortField) -> Self {
        Self::by(field, SortDirection::Desc)
    }

    /// Add a sort criterion (builder pattern)
    pub fn then(mut self, criterion: SortCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// Add ascending sort
    pub fn then_asc(self, field: SortField) -> Self {
        self.then(SortCriterion::asc(field))
    }

    /// Get all sort criteria
    pub fn criteria(&self) -> &[SortCriterion] {
        &self.criteria
    }

    /// Check if any sort is defined
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Get number of sort criteria
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Get the primary (first) sort criterion
    pub fn primary(&self) -> Option<&SortCriterion> {
        self.criteria.first()
    }

    /// Check if sorting by a specific field
    pub fn sorts_by(&self, field: SortField) -> bool {
        self.criteria.iter().any(|c| c.field == field)
    }

    /// Compare two records criterion by criterion
    pub fn compare<T: Sortable + ?Sized>(&self, a: &T, b: &T) -> Ordering {
        self.criteria
            .iter()
            .map(|c| c.compare(a, b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Stable sort of a slice of records
    pub fn sort<T: Sortable>(&self, records: &mut [T]) {
        if !self.is_empty() {
            records.sort_by(|a, b| self.compare(a, b));
        }
    }
}

/// Default sort order for attachments within a page
pub fn default_attachment_sort() -> SortOrder {
    SortOrder::by_asc(SortField::Position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        position: i64,
        title: Option<&'static str>,
    }

    impl Sortable for Row {
        fn sort_key(&self, field: SortField) -> SortKey {
            match field {
                SortField::Position => SortKey::Int(self.position),
                SortField::Title => self.title.into(),
                _ => SortKey::Null,
            }
        }
    }

    #[test]
    fn test_sort_direction() {
        assert_eq!(SortDirection::from_str("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::from_str("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::from_str("sideways"), None);
        assert_eq!(SortDirection::Asc.reverse(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.reverse(), SortDirection::Asc);
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!(SortField::from_str("position"), Some(SortField::Position));
        assert_eq!(SortField::from_str("created_at"), Some(SortField::CreatedAt));
        assert_eq!(SortField::from_str("content_type"), Some(SortField::ContentType));
        assert_eq!(SortField::from_str("filename; DROP TABLE"), None);
        for field in SortField::ALL {
            assert_eq!(SortField::from_str(field.as_str()), Some(field));
        }
    }

    #[test]
    fn test_sort_criterion() {
        let criterion = SortCriterion::asc(SortField::CreatedAt);
        assert_eq!(criterion.field, SortField::CreatedAt);
        assert_eq!(criterion.direction, SortDirection::Asc);

        let reversed = criterion.reversed();
        assert_eq!(reversed.direction, SortDirection::Desc);
    }

    #[test]
    fn test_sort_records() {
        let mut rows = vec![
            Row { position: 2, title: Some("b") },
            Row { position: 3, title: None },
            Row { position: 1, title: Some("a") },
        ];

        SortOrder::by_desc(SortField::Position).sort(&mut rows);
        assert_eq!(rows.iter().map(|r| r.position).collect::<Vec<_>>(), vec![3, 2, 1]);

        // missing values sort first
        SortOrder::by_asc(SortField::Title).sort(&mut rows);
        assert_eq!(rows.iter().map(|r| r.position).collect::<Vec<_>>(), vec![3, 1, 2]);
    }

    #[test]
    fn test_tiebreak_criteria() {
        let order = SortOrder::by_asc(SortField::Title).then_asc(SortField::Position);
        assert_eq!(order.len(), 2);
        assert!(order.sorts_by(SortField::Position));

        let a = Row { position: 5, title: Some("same") };
        let b = Row { position: 4, title: Some("same") };
        assert_eq!(order.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_default_sort() {
        let order = default_attachment_sort();
        let primary = order.primary().unwrap();
        assert_eq!(primary.field, SortField::Position);
        assert_eq!(primary.direction, SortDirection::Asc);
    }
}
