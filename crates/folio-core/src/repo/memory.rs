use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    bulk_delete_filters, compare_by, supported_filters, FilterSet, OrderSpec, PageWindow,
    Repository, Resource,
};
use crate::errors::{FolioError, Result};
use crate::model::ResourceId;

/// In-memory repository for a single resource type
///
/// Records live in a `BTreeMap` keyed by id, so iteration order is id order
/// and serves as the stable tie-break for `find_many`. Ids come from a
/// monotonically increasing sequence starting at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryRepository<R> {
    records: RwLock<BTreeMap<ResourceId, R>>,
    next_id: AtomicI64,
}

impl<R: Resource> MemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn read(&self, op: &str) -> Result<RwLockReadGuard<'_, BTreeMap<ResourceId, R>>> {
        self.records
            .read()
            .map_err(|_| FolioError::persistence(op, format!("{} store lock poisoned", R::KIND)))
    }

    fn write(&self, op: &str) -> Result<RwLockWriteGuard<'_, BTreeMap<ResourceId, R>>> {
        self.records
            .write()
            .map_err(|_| FolioError::persistence(op, format!("{} store lock poisoned", R::KIND)))
    }
}

impl<R: Resource> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> Repository<R> for MemoryRepository<R> {
    fn find_one(&self, id: ResourceId) -> Result<Option<R>> {
        Ok(self.read("find_one")?.get(&id).cloned())
    }

    fn find_many(
        &self,
        filters: &FilterSet,
        order: &OrderSpec,
        window: PageWindow,
    ) -> Result<Vec<R>> {
        let filters = supported_filters::<R>(filters);
        let records = self.read("find_many")?;
        let mut matched: Vec<&R> = records.values().filter(|r| r.matches(&filters)).collect();
        // Stable sort: records arrive in id order
        matched.sort_by(|a, b| compare_by(*a, *b, order));

        Ok(matched
            .into_iter()
            .skip(window.offset())
            .take(window.size())
            .cloned()
            .collect())
    }

    fn save(&self, mut resource: R) -> Result<R> {
        let mut records = self.write("save")?;
        let now = Utc::now();

        match resource.id() {
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                resource.assign_id(id);
                resource.touch(now);
                tracing::debug!(kind = R::KIND, id, "inserted");
                records.insert(id, resource.clone());
                Ok(resource)
            }
            Some(id) => {
                let stored = records.get(&id).ok_or_else(|| R::not_found(id))?;
                if stored.same_content(&resource) {
                    return Ok(stored.clone());
                }
                resource.touch(now);
                tracing::debug!(kind = R::KIND, id, "updated");
                records.insert(id, resource.clone());
                Ok(resource)
            }
        }
    }

    fn delete(&self, resource: &R) -> Result<()> {
        let id = resource.id().ok_or_else(|| R::not_found(0))?;
        let mut records = self.write("delete")?;
        records.remove(&id).ok_or_else(|| R::not_found(id))?;
        tracing::debug!(kind = R::KIND, id, "deleted");
        Ok(())
    }

    fn delete_where(&self, filters: &FilterSet) -> Result<usize> {
        let filters = bulk_delete_filters::<R>(filters)?;
        let mut records = self.write("delete_where")?;
        let before = records.len();
        records.retain(|_, r| !r.matches(&filters));
        let removed = before - records.len();
        tracing::debug!(kind = R::KIND, removed, "deleted matching");
        Ok(removed)
    }
}
