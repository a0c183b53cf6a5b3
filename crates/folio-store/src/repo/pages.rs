use folio_core::Page;
use rusqlite::types::Value as SqlValue;
use rusqlite::Row;

use super::sql::{from_millis, json_column, to_millis};
use super::{json_param, SqlResource};
use crate::errors::Result;

impl SqlResource for Page {
    const TABLE: &'static str = "pages";
    const COLUMNS: &'static [&'static str] = &[
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

    fn column(field: &str) -> Option<&'static str> {
        match field {
            "id" => Some("id"),
            "name" => Some("name"),
            "title" => Some("title"),
            "slug" => Some("slug"),
            "url" => Some("url"),
            "enabled" => Some("enabled"),
            "position" => Some("position"),
            "created_at" => Some("created_at"),
            "updated_at" => Some("updated_at"),
            _ => None,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Page {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            title: row.get(2)?,
            slug: row.get(3)?,
            url: row.get(4)?,
            template_code: row.get(5)?,
            route_name: row.get(6)?,
            enabled: row.get(7)?,
            position: row.get(8)?,
            attributes: json_column(row, 9)?,
            created_at: from_millis(row.get(10)?),
            updated_at: from_millis(row.get(11)?),
        })
    }

    fn to_params(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            SqlValue::from(self.name.clone()),
            SqlValue::from(self.title.clone()),
            SqlValue::from(self.slug.clone()),
            SqlValue::from(self.url.clone()),
            SqlValue::from(self.template_code.clone()),
            SqlValue::from(self.route_name.clone()),
            SqlValue::from(self.enabled),
            SqlValue::from(self.position),
            json_param(&self.attributes)?,
            to_millis(self.created_at),
            to_millis(self.updated_at),
        ])
    }
}
