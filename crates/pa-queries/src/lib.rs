//! # pa-queries
//!
//! Find options for attachment listings.
//!
//! Template tags such as `attachment:each` and `if_attachments` accept a flat
//! set of string attributes (`extensions`, `name_prefix`, `by`, `order`,
//! `limit`, `offset`). This crate turns them into a structured [`FindOptions`]
//! value holding filters, a sort order and a limit/offset window, which an
//! attachment store evaluates.
//!
//! ## Structure
//!
//! - `filters` - Filter conditions over string attributes
//! - `sorts` - Sort fields and directions
//! - `options` - The `FindOptions` value and its builder
//!
//! ## Example
//!
//! ```
//! use pa_queries::{FindOptions, SortDirection, UNBOUNDED_LIMIT};
//!
//! let options = FindOptions::builder()
//!     .extensions("png|pdf")
//!     .name_prefix("img_")
//!     .order("desc")
//!     .offset("5")
//!     .build();
//!
//! assert!(options.filters().matches_value("filename", "img_cover.png"));
//! assert!(!options.filters().matches_value("filename", "cover.png"));
//! assert_eq!(options.order().primary().unwrap().direction, SortDirection::Desc);
//! assert_eq!(options.limit(), Some(UNBOUNDED_LIMIT));
//! ```

pub mod filters;
pub mod sorts;
pub mod options;

// Re-exports for convenience
pub use filters::{Filter, FilterOperator, FilterSet, Filterable};
pub use sorts::{SortCriterion, SortDirection, SortField, SortKey, SortOrder, Sortable};
pub use options::{FindOptions, FindOptionsBuilder, UNBOUNDED_LIMIT};
