//! Pagination and filter descriptors shared by the list endpoints
//!
//! Domains parse their own typed query strings, then describe the window they
//! want with a [`PageRequest`]. The request knows how to express itself as
//! MongoDB find options or aggregation stages, so every list endpoint applies
//! sort, skip and limit the same way.
//!
//! ```
//! use pagination::{PageRequest, SortOrder};
//!
//! let page = PageRequest::new(3, 20)
//!     .unwrap()
//!     .with_sort("cost_price", SortOrder::Desc);
//! assert_eq!(page.skip(), 40);
//! ```

use mongodb::bson::{Bson, Document, doc};
use mongodb::options::FindOptions;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Highest page whose offset still fits a BSON `$skip` (an i64)
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_LIMIT + 1;

/// serde default for `page` query parameters
pub fn default_page() -> u64 {
    DEFAULT_PAGE
}

/// serde default for `limit` query parameters
pub fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    #[error("page must be between 1 and {MAX_PAGE}, got {0}")]
    InvalidPage(u64),

    #[error("limit must be between 1 and {MAX_LIMIT}, got {0}")]
    InvalidLimit(u64),

    #[error("range for '{field}' has min greater than max")]
    InvertedRange { field: &'static str },
}

/// Sort direction
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// MongoDB sort direction (1 or -1)
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// Field and direction to order by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

/// A validated pagination window with optional ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
    sort: Option<SortSpec>,
}

impl PageRequest {
    /// `page` is 1-based and at most [`MAX_PAGE`]; `limit` must be in `1..=MAX_LIMIT`.
    pub fn new(page: u64, limit: u64) -> Result<Self, PageError> {
        if !(1..=MAX_PAGE).contains(&page) {
            return Err(PageError::InvalidPage(page));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(PageError::InvalidLimit(limit));
        }
        Ok(Self {
            page,
            limit,
            sort: None,
        })
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(SortSpec {
            field: field.into(),
            order,
        });
        self
    }

    /// Attach a sort only when a field was requested
    pub fn with_optional_sort<F: ToString>(self, field: Option<F>, order: SortOrder) -> Self {
        match field {
            Some(field) => self.with_sort(field.to_string(), order),
            None => self,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Records to skip before the window starts. Never exceeds `i64::MAX`.
    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    fn skip_i64(&self) -> i64 {
        i64::try_from(self.skip()).unwrap_or(i64::MAX)
    }

    /// `{ <prefix>.<field>: ±1 }` when a sort was requested.
    ///
    /// `prefix` addresses a sub-document, e.g. `product` after a `$lookup`.
    pub fn sort_document(&self, prefix: Option<&str>) -> Option<Document> {
        self.sort.as_ref().map(|spec| {
            let key = match prefix {
                Some(prefix) => format!("{}.{}", prefix, spec.field),
                None => spec.field.clone(),
            };
            let mut sort = Document::new();
            sort.insert(key, spec.order.direction());
            sort
        })
    }

    /// Options for `Collection::find`: sort (if any), then skip and limit
    pub fn find_options(&self) -> FindOptions {
        let mut options = FindOptions::default();
        options.sort = self.sort_document(None);
        options.skip = Some(self.skip());
        options.limit = Some(self.limit as i64);
        options
    }

    /// `$skip` and `$limit` aggregation stages
    pub fn window_stages(&self) -> [Document; 2] {
        [
            doc! { "$skip": self.skip_i64() },
            doc! { "$limit": self.limit as i64 },
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: None,
        }
    }
}

/// Inclusive numeric range; either bound may be open
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Reject `min > max` for the named field
    pub fn validate(&self, field: &'static str) -> Result<(), PageError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Err(PageError::InvertedRange { field }),
            _ => Ok(()),
        }
    }

    /// `{ $gte: min, $lte: max }` with only the bounds that are set
    pub fn to_bson(&self) -> Option<Bson> {
        if self.is_empty() {
            return None;
        }
        let mut range = Document::new();
        if let Some(min) = self.min {
            range.insert("$gte", min);
        }
        if let Some(max) = self.max {
            range.insert("$lte", max);
        }
        Some(Bson::Document(range))
    }
}
