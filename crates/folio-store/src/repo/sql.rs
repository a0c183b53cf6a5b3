//! SQL text and parameter building for repository queries
//!
//! Column names only ever come from a resource's static allowlist; client
//! values always travel as bound parameters.

use chrono::{DateTime, TimeZone, Utc};
use folio_core::repo::{supported_filters, FilterSet, FilterValue, OrderSpec, PageWindow};
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::Row;
use serde::de::DeserializeOwned;

use super::SqlResource;

pub(crate) fn quoted(column: &str) -> String {
    format!("\"{}\"", column)
}

/// `"id", "col1", ...` in the order `SqlResource::from_row` reads them
pub(crate) fn select_list<R: SqlResource>() -> String {
    std::iter::once("id")
        .chain(R::COLUMNS.iter().copied())
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn select_by_id<R: SqlResource>() -> String {
    format!(
        "SELECT {} FROM {} WHERE \"id\" = ?1",
        select_list::<R>(),
        R::TABLE
    )
}

pub(crate) fn insert<R: SqlResource>() -> String {
    let placeholders = (1..=R::COLUMNS.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        R::TABLE,
        R::COLUMNS.iter().copied().map(quoted).collect::<Vec<_>>().join(", "),
        placeholders
    )
}

pub(crate) fn update<R: SqlResource>() -> String {
    let assignments = R::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ?{}", quoted(column), i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE \"id\" = ?{}",
        R::TABLE,
        assignments,
        R::COLUMNS.len() + 1
    )
}

/// Filter, order and window a SELECT
///
/// Filters are narrowed to the resource's allowlist first and sort fields
/// outside it are skipped, matching the in-memory repository. `id ASC` is
/// always the last ordering term.
pub(crate) fn select_many<R: SqlResource>(
    filters: &FilterSet,
    order: &OrderSpec,
    window: PageWindow,
) -> (String, Vec<SqlValue>) {
    let mut sql = format!("SELECT {} FROM {}", select_list::<R>(), R::TABLE);
    let mut params = Vec::new();
    sql.push_str(&where_clause::<R>(&supported_filters::<R>(filters), &mut params));

    let mut terms = Vec::new();
    for (field, direction) in order.iter() {
        if !R::SORT_FIELDS.contains(&field) {
            continue;
        }
        if let Some(column) = R::column(field) {
            terms.push(format!("{} {}", quoted(column), direction.as_sql()));
        }
    }
    terms.push("\"id\" ASC".to_string());
    sql.push_str(" ORDER BY ");
    sql.push_str(&terms.join(", "));

    if !window.is_unbounded() {
        params.push(SqlValue::Integer(to_i64(window.size())));
        params.push(SqlValue::Integer(to_i64(window.offset())));
        sql.push_str(&format!(
            " LIMIT ?{} OFFSET ?{}",
            params.len() - 1,
            params.len()
        ));
    }

    (sql, params)
}

/// DELETE every row matching already-narrowed, non-empty `filters`
pub(crate) fn delete_where<R: SqlResource>(filters: &FilterSet) -> (String, Vec<SqlValue>) {
    let mut params = Vec::new();
    let clause = where_clause::<R>(filters, &mut params);
    (format!("DELETE FROM {}{}", R::TABLE, clause), params)
}

/// ` WHERE a = ?1 AND ...`, or empty when no filter maps to a column
fn where_clause<R: SqlResource>(filters: &FilterSet, params: &mut Vec<SqlValue>) -> String {
    let mut clauses = Vec::new();
    for (field, value) in filters.iter() {
        let Some(column) = R::column(field) else {
            continue;
        };
        params.push(filter_param(value));
        clauses.push(format!("{} = ?{}", quoted(column), params.len()));
    }
    if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    }
}

fn filter_param(value: &FilterValue) -> SqlValue {
    match value {
        FilterValue::Bool(b) => SqlValue::Integer(i64::from(*b)),
        FilterValue::Int(n) => SqlValue::Integer(*n),
        FilterValue::Text(s) => SqlValue::Text(s.clone()),
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Current time at the millisecond precision the tables store
pub(crate) fn now() -> DateTime<Utc> {
    from_millis(Some(Utc::now().timestamp_millis())).unwrap_or_else(Utc::now)
}

pub(crate) fn to_millis(ts: Option<DateTime<Utc>>) -> SqlValue {
    ts.map_or(SqlValue::Null, |t| SqlValue::Integer(t.timestamp_millis()))
}

pub(crate) fn from_millis(ms: Option<i64>) -> Option<DateTime<Utc>> {
    ms.and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

/// Decode a JSON text column
pub(crate) fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
