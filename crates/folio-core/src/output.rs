//! Output shaping: project a serialized resource onto a visibility group
//!
//! Callers own the response format; this only decides which fields are
//! visible and how deep nested content may go.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::errors::{FolioError, Result};
use crate::rules::Schema;

pub const GROUP_READ: &str = "read";
pub const GROUP_WRITE: &str = "write";

/// Nesting allowed below a top-level field unless configured otherwise
pub const DEFAULT_MAX_DEPTH: usize = 4;

const PAGE_READ_FIELDS: &[&str] = &[
    "id",
    "name",
    "title",
    "slug",
    "url",
    "template_code",
    "route_name",
    "enabled",
    "position",
    "attributes",
    "created_at",
    "updated_at",
];

const BLOCK_READ_FIELDS: &[&str] = &[
    "id",
    "page_id",
    "name",
    "type",
    "settings",
    "position",
    "enabled",
    "created_at",
    "updated_at",
];

/// Field visibility per group plus a nesting limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    groups: BTreeMap<String, Vec<String>>,
    max_depth: usize,
}

impl OutputSchema {
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn group<I, S>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .insert(name.into(), fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn fields(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Serialize `resource` and keep only the fields visible in `group`
    ///
    /// Objects and arrays nested deeper than the configured limit are
    /// replaced by `null`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an unknown group and `Serialization`
    /// if the resource does not serialize to an object.
    pub fn shape<T: Serialize>(&self, resource: &T, group: &str) -> Result<Value> {
        let fields = self.fields(group).ok_or_else(|| {
            FolioError::invalid_parameter("group", format!("unknown output group '{}'", group))
        })?;

        let Value::Object(mut source) = serde_json::to_value(resource)? else {
            return Err(FolioError::Serialization {
                message: "resource did not serialize to an object".to_string(),
            });
        };

        let mut shaped = Map::new();
        for field in fields {
            if let Some(value) = source.remove(field) {
                shaped.insert(field.clone(), truncate(value, self.max_depth));
            }
        }
        Ok(Value::Object(shaped))
    }

    /// Shape every item of a collection
    ///
    /// # Errors
    ///
    /// Same as [`OutputSchema::shape`].
    pub fn shape_all<T: Serialize>(&self, resources: &[T], group: &str) -> Result<Value> {
        resources
            .iter()
            .map(|r| self.shape(r, group))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

impl Default for OutputSchema {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate(value: Value, depth: usize) -> Value {
    match value {
        Value::Object(_) | Value::Array(_) if depth == 0 => Value::Null,
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, truncate(v, depth - 1)))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| truncate(v, depth - 1)).collect())
        }
        scalar => scalar,
    }
}

fn write_fields(schema: &Schema) -> Vec<&'static str> {
    schema.rules().iter().map(|r| r.target).collect()
}

/// `read` exposes every page field, `write` only the writable ones
pub fn page_output_schema() -> OutputSchema {
    OutputSchema::new()
        .group(GROUP_READ, PAGE_READ_FIELDS.iter().copied())
        .group(GROUP_WRITE, write_fields(&crate::rules::page_schema()))
}

pub fn block_output_schema() -> OutputSchema {
    OutputSchema::new()
        .group(GROUP_READ, BLOCK_READ_FIELDS.iter().copied())
        .group(GROUP_WRITE, write_fields(&crate::rules::block_schema()))
}
