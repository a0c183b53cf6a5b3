//! Parameter parsing for handler operations
//!
//! Everything here runs before any repository is touched: a malformed
//! parameter is an `InvalidParameter` error, never an empty result.

use folio_core::errors::{FolioError, Result};
use folio_core::repo::{ensure_sortable, FilterSet, FilterValue, OrderSpec, PageWindow};
use folio_core::{Page, ResourceId};
use serde::{Deserialize, Serialize};

use folio_core::dispatch::SNAPSHOT_JOB;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// What deleting a page does to the blocks it owns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Delete the page's blocks with it
    #[default]
    Cascade,
    /// Refuse with `PageNotEmpty` while blocks remain
    RejectIfNonEmpty,
}

/// Handler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// `count` used when a list request omits it
    pub default_page_size: usize,
    /// Largest `count` a list request may ask for
    pub max_page_size: usize,
    pub delete_policy: DeletePolicy,
    /// Job name submitted by `request_snapshot`
    pub snapshot_job: String,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            delete_policy: DeletePolicy::default(),
            snapshot_job: SNAPSHOT_JOB.to_string(),
        }
    }
}

/// Raw list-pages query parameters, exactly as received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPagesParams {
    /// One-based page number
    pub page: Option<String>,
    /// Page size
    pub count: Option<String>,
    /// `0` or `1`
    pub enabled: Option<String>,
    /// `(field, direction)` pairs, applied in order
    pub order_by: Vec<(String, String)>,
}

impl ListPagesParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn count(mut self, count: impl Into<String>) -> Self {
        self.count = Some(count.into());
        self
    }

    pub fn enabled(mut self, enabled: impl Into<String>) -> Self {
        self.enabled = Some(enabled.into());
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
        self.order_by.push((field.into(), direction.into()));
        self
    }

    /// Validate and convert into repository query inputs
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first offending parameter.
    pub fn parse(&self, config: &HandlerConfig) -> Result<PageQuery> {
        let page = match &self.page {
            Some(raw) => parse_digits("page", raw)?,
            None => 1,
        };
        let count = match &self.count {
            Some(raw) => parse_digits("count", raw)?,
            None => config.default_page_size,
        };
        if count > config.max_page_size {
            return Err(FolioError::invalid_parameter(
                "count",
                format!("must be at most {}", config.max_page_size),
            ));
        }
        let window = PageWindow::from_one_based(page, count)?;

        let mut filters = FilterSet::new();
        filters.insert("enabled", self.enabled.as_deref().map(parse_flag).transpose()?);

        let mut order = OrderSpec::new();
        for (field, direction) in &self.order_by {
            order.push(field.clone(), direction.parse()?);
        }
        ensure_sortable::<Page>(&order)?;

        Ok(PageQuery {
            filters,
            order,
            window,
        })
    }
}

/// Validated list query
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub filters: FilterSet,
    pub order: OrderSpec,
    pub window: PageWindow,
}

/// Parse a path identifier
///
/// # Errors
///
/// Returns `InvalidParameter` unless `raw` is all ASCII digits and fits.
pub fn parse_id(name: &str, raw: &str) -> Result<ResourceId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FolioError::invalid_parameter(name, "must be a number"));
    }
    raw.parse()
        .map_err(|_| FolioError::invalid_parameter(name, "out of range"))
}

fn parse_digits(name: &str, raw: &str) -> Result<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FolioError::invalid_parameter(
            name,
            format!("must be a number, got '{}'", raw),
        ));
    }
    raw.parse()
        .map_err(|_| FolioError::invalid_parameter(name, "out of range"))
}

fn parse_flag(raw: &str) -> Result<FilterValue> {
    match raw {
        "1" => Ok(FilterValue::Bool(true)),
        "0" => Ok(FilterValue::Bool(false)),
        other => Err(FolioError::invalid_parameter(
            "enabled",
            format!("must be 0 or 1, got '{}'", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::repo::Direction;

    fn parse(params: ListPagesParams) -> Result<PageQuery> {
        params.parse(&HandlerConfig::default())
    }

    fn rejected_param(result: Result<PageQuery>) -> String {
        match result {
            Err(FolioError::InvalidParameter { name, .. }) => name,
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let query = parse(ListPagesParams::new()).unwrap();
        assert_eq!(query.window, PageWindow::new(0, DEFAULT_PAGE_SIZE).unwrap());
        assert!(query.filters.is_empty());
        assert!(query.order.is_empty());
    }

    #[test]
    fn test_first_page_enabled_only() {
        let query = parse(ListPagesParams::new().page("1").count("10").enabled("1")).unwrap();
        assert_eq!(query.window.index(), 0);
        assert_eq!(query.window.size(), 10);
        assert_eq!(query.filters, FilterSet::new().with("enabled", true));
    }

    #[test]
    fn test_order_terms_keep_request_order() {
        let query = parse(
            ListPagesParams::new()
                .order_by("position", "ASC")
                .order_by("name", "DESC"),
        )
        .unwrap();
        let terms: Vec<_> = query.order.iter().collect();
        assert_eq!(
            terms,
            vec![("position", Direction::Asc), ("name", Direction::Desc)]
        );
    }

    #[test]
    fn test_rejections() {
        assert_eq!(rejected_param(parse(ListPagesParams::new().page("0"))), "page");
        assert_eq!(rejected_param(parse(ListPagesParams::new().page("-1"))), "page");
        assert_eq!(rejected_param(parse(ListPagesParams::new().count("ten"))), "count");
        assert_eq!(rejected_param(parse(ListPagesParams::new().count("0"))), "count");
        assert_eq!(rejected_param(parse(ListPagesParams::new().count("101"))), "count");
        assert_eq!(rejected_param(parse(ListPagesParams::new().enabled("true"))), "enabled");
        assert_eq!(
            rejected_param(parse(ListPagesParams::new().order_by("name", "asc"))),
            "orderBy"
        );
        assert_eq!(
            rejected_param(parse(ListPagesParams::new().order_by("attributes", "ASC"))),
            "orderBy"
        );
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("id", "42").unwrap(), 42);
        assert!(parse_id("id", "4a").is_err());
        assert!(parse_id("id", "").is_err());
        assert!(parse_id("id", "99999999999999999999").is_err());
    }
}
