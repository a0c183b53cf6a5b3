//! Query inputs shared by every repository: filters, ordering, windows

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::errors::{FolioError, Result};

/// A typed value a filter field must equal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

/// Equality filters combined with AND semantics
///
/// Null-valued entries never make it in: `insert(field, None)` is a no-op,
/// which mirrors how an absent query parameter behaves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    entries: BTreeMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert` for a known-present value
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.entries.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Option<FilterValue>) {
        if let Some(value) = value {
            self.entries.insert(field.into(), value);
        }
    }

    /// Drop every entry whose field is not in `supported`
    pub fn retain_supported(&mut self, supported: &[&str]) {
        self.entries.retain(|field, _| supported.contains(&field.as_str()));
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.entries.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    /// Orient an ascending comparison
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for Direction {
    type Err = FolioError;

    /// Only the exact literals `ASC` and `DESC` are accepted
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ASC" => Ok(Direction::Asc),
            "DESC" => Ok(Direction::Desc),
            other => Err(FolioError::invalid_parameter(
                "orderBy",
                format!("direction must be ASC or DESC, got '{}'", other),
            )),
        }
    }
}

/// Ordered list of `(field, direction)` sort terms
///
/// Terms apply left to right; identifier order breaks any remaining ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderSpec {
    terms: Vec<(String, Direction)>,
}

impl OrderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.push(field, direction);
        self
    }

    pub fn push(&mut self, field: impl Into<String>, direction: Direction) {
        self.terms.push((field.into(), direction));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Direction)> {
        self.terms.iter().map(|(f, d)| (f.as_str(), *d))
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Zero-based pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    index: usize,
    size: usize,
}

impl PageWindow {
    /// # Errors
    ///
    /// Returns `InvalidParameter` when `size` is zero.
    pub fn new(index: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(FolioError::invalid_parameter(
                "count",
                "page size must be at least 1",
            ));
        }
        Ok(Self { index, size })
    }

    /// Build a window from a one-based external page number
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` when `page` is zero or `size` is zero.
    pub fn from_one_based(page: usize, size: usize) -> Result<Self> {
        let index = page
            .checked_sub(1)
            .ok_or_else(|| FolioError::invalid_parameter("page", "page must be at least 1"))?;
        Self::new(index, size)
    }

    /// Window covering every row
    pub fn unbounded() -> Self {
        Self {
            index: 0,
            size: usize::MAX,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn offset(&self) -> usize {
        self.index.saturating_mul(self.size)
    }

    pub fn is_unbounded(&self) -> bool {
        self.size == usize::MAX
    }
}

/// Comparable projection of a sortable field
///
/// A given field always yields the same variant, so cross-variant ordering
/// never decides a comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Bool(bool),
    Int(i64),
    Text(Option<String>),
    Time(Option<DateTime<Utc>>),
}
