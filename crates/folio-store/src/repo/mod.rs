//! SQLite-backed repositories
//!
//! `SqliteRepository<R>` implements folio-core's `Repository` contract for
//! any resource that knows its table layout ([`SqlResource`]). Query
//! semantics match `MemoryRepository`: AND filters, allowlisted ordering with
//! id as the final tie-break, idempotent saves.

mod blocks;
mod pages;
pub(crate) mod sql;

use folio_core::errors::FolioError;
use folio_core::repo::{
    bulk_delete_filters, FilterSet, OrderSpec, PageWindow, Repository, Resource,
};
use folio_core::{Block, Page, ResourceId};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, Row};
use std::marker::PhantomData;

use crate::db::{lock, SharedConnection};
use crate::errors::{from_rusqlite, Result};

/// Table layout of a persistable resource
pub trait SqlResource: Resource {
    const TABLE: &'static str;
    /// Every column except `id`, in bind order
    const COLUMNS: &'static [&'static str];

    /// Column backing a filter or sort field
    fn column(field: &str) -> Option<&'static str>;

    /// Decode a row selected as `id` followed by `COLUMNS`
    ///
    /// # Errors
    ///
    /// Returns the rusqlite error for a missing or mistyped column.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Values for `COLUMNS`, in order
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a JSON column cannot be encoded.
    fn to_params(&self) -> Result<Vec<SqlValue>>;
}

pub struct SqliteRepository<R> {
    conn: SharedConnection,
    _resource: PhantomData<fn() -> R>,
}

pub type SqlitePageRepository = SqliteRepository<Page>;
pub type SqliteBlockRepository = SqliteRepository<Block>;

impl<R: SqlResource> SqliteRepository<R> {
    pub fn new(conn: SharedConnection) -> Self {
        Self {
            conn,
            _resource: PhantomData,
        }
    }

    fn load(conn: &Connection, id: ResourceId) -> Result<Option<R>> {
        conn.query_row(&sql::select_by_id::<R>(), [id], R::from_row)
            .optional()
            .map_err(from_rusqlite)
    }
}

impl<R: SqlResource> Repository<R> for SqliteRepository<R> {
    fn find_one(&self, id: ResourceId) -> Result<Option<R>> {
        let conn = lock(&self.conn, "find_one")?;
        Self::load(&conn, id)
    }

    fn find_many(
        &self,
        filters: &FilterSet,
        order: &OrderSpec,
        window: PageWindow,
    ) -> Result<Vec<R>> {
        let (query, params) = sql::select_many::<R>(filters, order, window);
        let conn = lock(&self.conn, "find_many")?;
        let mut stmt = conn.prepare(&query).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), R::from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    fn save(&self, mut resource: R) -> Result<R> {
        let conn = lock(&self.conn, "save")?;
        let now = sql::now();

        match resource.id() {
            None => {
                resource.touch(now);
                let params = resource.to_params()?;
                conn.execute(&sql::insert::<R>(), rusqlite::params_from_iter(params.iter()))
                    .map_err(from_rusqlite)?;
                let id = conn.last_insert_rowid();
                resource.assign_id(id);
                tracing::debug!(kind = R::KIND, id, "inserted");
                Ok(resource)
            }
            Some(id) => {
                let stored = Self::load(&conn, id)?.ok_or_else(|| R::not_found(id))?;
                if stored.same_content(&resource) {
                    return Ok(stored);
                }
                resource.touch(now);
                let mut params = resource.to_params()?;
                params.push(SqlValue::Integer(id));
                conn.execute(&sql::update::<R>(), rusqlite::params_from_iter(params.iter()))
                    .map_err(from_rusqlite)?;
                tracing::debug!(kind = R::KIND, id, "updated");
                Ok(resource)
            }
        }
    }

    fn delete(&self, resource: &R) -> Result<()> {
        let id = resource.id().ok_or_else(|| R::not_found(0))?;
        let conn = lock(&self.conn, "delete")?;
        let removed = conn
            .execute(&format!("DELETE FROM {} WHERE \"id\" = ?1", R::TABLE), [id])
            .map_err(from_rusqlite)?;
        if removed == 0 {
            return Err(R::not_found(id));
        }
        tracing::debug!(kind = R::KIND, id, "deleted");
        Ok(())
    }

    fn delete_where(&self, filters: &FilterSet) -> Result<usize> {
        let filters = bulk_delete_filters::<R>(filters)?;
        let (query, params) = sql::delete_where::<R>(&filters);
        let conn = lock(&self.conn, "delete_where")?;
        let removed = conn
            .execute(&query, rusqlite::params_from_iter(params.iter()))
            .map_err(from_rusqlite)?;
        tracing::debug!(kind = R::KIND, removed, "deleted matching");
        Ok(removed)
    }
}

fn json_param<T: serde::Serialize>(value: &T) -> Result<SqlValue> {
    serde_json::to_string(value)
        .map(SqlValue::Text)
        .map_err(FolioError::from)
}
