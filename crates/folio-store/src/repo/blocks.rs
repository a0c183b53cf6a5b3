use folio_core::Block;
use rusqlite::types::Value as SqlValue;
use rusqlite::Row;

use super::sql::{from_millis, json_column, to_millis};
use super::{json_param, SqlResource};
use crate::errors::Result;

impl SqlResource for Block {
    const TABLE: &'static str = "blocks";
    const COLUMNS: &'static [&'static str] = &[
        "page_id",
        "name",
        "type",
        "settings",
        "position",
        "enabled",
        "created_at",
        "updated_at",
    ];

    fn column(field: &str) -> Option<&'static str> {
        match field {
            "id" => Some("id"),
            "page" => Some("page_id"),
            "name" => Some("name"),
            "type" => Some("type"),
            "position" => Some("position"),
            "enabled" => Some("enabled"),
            "created_at" => Some("created_at"),
            "updated_at" => Some("updated_at"),
            _ => None,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Block {
            id: Some(row.get(0)?),
            page_id: row.get(1)?,
            name: row.get(2)?,
            block_type: row.get(3)?,
            settings: json_column(row, 4)?,
            position: row.get(5)?,
            enabled: row.get(6)?,
            created_at: from_millis(row.get(7)?),
            updated_at: from_millis(row.get(8)?),
        })
    }

    fn to_params(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            SqlValue::from(self.page_id),
            SqlValue::from(self.name.clone()),
            SqlValue::from(self.block_type.clone()),
            json_param(&self.settings)?,
            SqlValue::from(self.position),
            SqlValue::from(self.enabled),
            to_millis(self.created_at),
            to_millis(self.updated_at),
        ])
    }
}
