use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attributes, ResourceId};
use crate::errors::FolioError;
use crate::repo::{FilterValue, Resource, SortKey};

/// Block - a unit of content placed on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Assigned by the repository on first save, immutable afterwards
    pub id: Option<ResourceId>,

    /// Owning page; required before the block can be saved
    pub page_id: Option<ResourceId>,

    pub name: Option<String>,

    /// Block service type, e.g. `text`, `menu`, `container`
    #[serde(rename = "type")]
    pub block_type: String,

    /// Content payload, interpreted by whatever renders the block type
    pub settings: Attributes,

    /// Sort position within the page
    pub position: i64,

    pub enabled: bool,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Block {
    /// Create an unsaved block of the given type on a page
    pub fn new(page_id: ResourceId, block_type: impl Into<String>) -> Self {
        Self {
            page_id: Some(page_id),
            block_type: block_type.into(),
            ..Self::default()
        }
    }

    fn without_timestamps(&self) -> Self {
        Self {
            created_at: None,
            updated_at: None,
            ..self.clone()
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Self {
            id: None,
            page_id: None,
            name: None,
            block_type: String::new(),
            settings: Attributes::new(),
            position: 1,
            enabled: true,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Resource for Block {
    const KIND: &'static str = "block";
    const FILTER_FIELDS: &'static [&'static str] = &["page", "enabled", "type"];
    const SORT_FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "type",
        "position",
        "enabled",
        "created_at",
        "updated_at",
    ];

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn assign_id(&mut self, id: ResourceId) {
        self.id = Some(id);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }

    fn filter_value(&self, field: &str) -> Option<FilterValue> {
        match field {
            // An unassigned block never matches a page filter
            "page" => Some(FilterValue::Int(self.page_id.unwrap_or(-1))),
            "enabled" => Some(FilterValue::Bool(self.enabled)),
            "type" => Some(FilterValue::Text(self.block_type.clone())),
            _ => None,
        }
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        let key = match field {
            "id" => SortKey::Int(self.id.unwrap_or_default()),
            "name" => SortKey::Text(self.name.clone()),
            "type" => SortKey::Text(Some(self.block_type.clone())),
            "position" => SortKey::Int(self.position),
            "enabled" => SortKey::Bool(self.enabled),
            "created_at" => SortKey::Time(self.created_at),
            "updated_at" => SortKey::Time(self.updated_at),
            _ => return None,
        };
        Some(key)
    }

    fn same_content(&self, other: &Self) -> bool {
        self.without_timestamps() == other.without_timestamps()
    }

    fn not_found(id: ResourceId) -> FolioError {
        FolioError::BlockNotFound { block_id: id }
    }
}
