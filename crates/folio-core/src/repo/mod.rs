//! Resource repository contract
//!
//! A repository is instantiated once per resource type and owns all state
//! for it. Callers never see storage details: they look resources up by id,
//! query with a [`FilterSet`] / [`OrderSpec`] / [`PageWindow`], and save or
//! delete whole resources.

pub mod memory;
pub mod query;

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::errors::{FolioError, Result};
use crate::model::ResourceId;

pub use memory::MemoryRepository;
pub use query::{Direction, FilterSet, FilterValue, OrderSpec, PageWindow, SortKey};

/// A persistable domain entity with an allowlist of query fields
pub trait Resource: Clone + Send + Sync + 'static {
    /// Lowercase resource name used in errors and logs
    const KIND: &'static str;
    /// Fields accepted in a [`FilterSet`]
    const FILTER_FIELDS: &'static [&'static str];
    /// Fields accepted in an [`OrderSpec`]
    const SORT_FIELDS: &'static [&'static str];

    fn id(&self) -> Option<ResourceId>;

    /// Set the identifier; only repositories call this, on insert
    fn assign_id(&mut self, id: ResourceId);

    /// Stamp `updated_at`, and `created_at` if unset
    fn touch(&mut self, now: DateTime<Utc>);

    /// Current value of a filter field, `None` if the field is not filterable
    fn filter_value(&self, field: &str) -> Option<FilterValue>;

    /// Current value of a sort field, `None` if the field is not sortable
    fn sort_key(&self, field: &str) -> Option<SortKey>;

    /// Equality on everything except timestamps
    fn same_content(&self, other: &Self) -> bool;

    /// The error reported when `id` does not resolve
    fn not_found(id: ResourceId) -> FolioError;

    /// AND across all entries
    ///
    /// An entry on a field this resource cannot filter by never matches;
    /// narrow with [`supported_filters`] first.
    fn matches(&self, filters: &FilterSet) -> bool {
        filters
            .iter()
            .all(|(field, expected)| self.filter_value(field).as_ref() == Some(expected))
    }
}

/// Storage contract for one resource type
///
/// Implementations guard their own backing store, so a repository can be
/// shared across concurrent requests behind an `Arc`.
#[allow(clippy::result_large_err)]
pub trait Repository<R: Resource>: Send + Sync {
    /// Look a resource up by id
    ///
    /// An unknown id is `Ok(None)`; callers decide whether that is an error.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing store fails.
    fn find_one(&self, id: ResourceId) -> Result<Option<R>>;

    /// Filter, order, then window
    ///
    /// Returns at most `window.size()` resources starting at
    /// `window.offset()`. Ties left by `order` fall back to id order.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing store fails.
    fn find_many(&self, filters: &FilterSet, order: &OrderSpec, window: PageWindow)
        -> Result<Vec<R>>;

    /// Insert when the id is unset, update otherwise
    ///
    /// Saving a resource whose content equals the stored one returns the
    /// stored value untouched.
    ///
    /// # Errors
    ///
    /// Returns the resource's not-found error when updating an unknown id,
    /// or `Persistence` if the backing store fails.
    fn save(&self, resource: R) -> Result<R>;

    /// Remove a stored resource
    ///
    /// # Errors
    ///
    /// Returns the resource's not-found error when the id is unset or
    /// unknown, or `Persistence` if the backing store fails.
    fn delete(&self, resource: &R) -> Result<()>;

    /// Remove every resource matching `filters` in one step
    ///
    /// Either all matches are removed or none are. Returns how many were.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` when no supported filter remains (that
    /// would remove everything), or `Persistence` if the backing store fails.
    fn delete_where(&self, filters: &FilterSet) -> Result<usize>;
}

/// Narrow `filters` to the resource's allowlist before querying
pub fn supported_filters<R: Resource>(filters: &FilterSet) -> FilterSet {
    let mut supported = filters.clone();
    supported.retain_supported(R::FILTER_FIELDS);
    supported
}

/// [`supported_filters`], refusing an empty result
///
/// # Errors
///
/// Returns `InvalidParameter` when no supported filter remains.
pub fn bulk_delete_filters<R: Resource>(filters: &FilterSet) -> Result<FilterSet> {
    let supported = supported_filters::<R>(filters);
    if supported.is_empty() {
        return Err(FolioError::invalid_parameter(
            "filters",
            format!("bulk {} delete needs at least one supported filter", R::KIND),
        ));
    }
    Ok(supported)
}

/// Compare two resources by an order spec, falling back to id order
pub fn compare_by<R: Resource>(a: &R, b: &R, order: &OrderSpec) -> Ordering {
    for (field, direction) in order.iter() {
        let ordering = match (a.sort_key(field), b.sort_key(field)) {
            (Some(ka), Some(kb)) => ka.cmp(&kb),
            _ => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return direction.apply(ordering);
        }
    }
    a.id().cmp(&b.id())
}

/// Check every order field against the resource's sortable allowlist
///
/// # Errors
///
/// Returns `InvalidParameter` naming the first unsupported field.
pub fn ensure_sortable<R: Resource>(order: &OrderSpec) -> Result<()> {
    for (field, _) in order.iter() {
        if !R::SORT_FIELDS.contains(&field) {
            return Err(FolioError::invalid_parameter(
                "orderBy",
                format!("cannot order {} by '{}'", R::KIND, field),
            ));
        }
    }
    Ok(())
}
