use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attributes, ResourceId};
use crate::errors::FolioError;
use crate::repo::{FilterValue, Resource, SortKey};

/// Page - a routable unit of content that owns an ordered set of blocks
///
/// Blocks reference their page through `Block::page_id`; the page itself
/// does not embed them, so a page can be read without loading its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Assigned by the repository on first save, immutable afterwards
    pub id: Option<ResourceId>,

    /// Internal name, required
    pub name: String,

    pub title: Option<String>,
    pub slug: Option<String>,
    pub url: Option<String>,
    pub template_code: Option<String>,
    pub route_name: Option<String>,

    pub enabled: bool,

    /// Sort position among sibling pages
    pub position: i64,

    /// Anything else the site stores on a page (SEO fields, custom data)
    pub attributes: Attributes,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Page {
    /// Create an unsaved, disabled page with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
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

impl Default for Page {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            title: None,
            slug: None,
            url: None,
            template_code: None,
            route_name: None,
            enabled: false,
            position: 1,
            attributes: Attributes::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Resource for Page {
    const KIND: &'static str = "page";
    const FILTER_FIELDS: &'static [&'static str] = &["enabled"];
    const SORT_FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "title",
        "slug",
        "url",
        "enabled",
        "position",
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
            "enabled" => Some(FilterValue::Bool(self.enabled)),
            _ => None,
        }
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        let key = match field {
            "id" => SortKey::Int(self.id.unwrap_or_default()),
            "name" => SortKey::Text(Some(self.name.clone())),
            "title" => SortKey::Text(self.title.clone()),
            "slug" => SortKey::Text(self.slug.clone()),
            "url" => SortKey::Text(self.url.clone()),
            "enabled" => SortKey::Bool(self.enabled),
            "position" => SortKey::Int(self.position),
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
        FolioError::PageNotFound { page_id: id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_page_defaults() {
        let page = Page::new("home");
        assert_eq!(page.name, "home");
        assert!(!page.enabled);
        assert_eq!(page.position, 1);
        assert!(page.id.is_none());
        assert!(page.created_at.is_none());
    }

    #[test]
    fn test_touch_keeps_created_at() {
        let mut page = Page::new("home");
        let first = Utc::now();
        page.touch(first);
        let later = first + chrono::Duration::seconds(5);
        page.touch(later);

        assert_eq!(page.created_at, Some(first));
        assert_eq!(page.updated_at, Some(later));
    }

    #[test]
    fn test_same_content_ignores_timestamps() {
        let mut a = Page::new("home");
        let b = a.clone();
        a.touch(Utc::now());
        assert!(a.same_content(&b));

        let mut c = b.clone();
        c.enabled = true;
        assert!(!c.same_content(&b));
    }

    #[test]
    fn test_only_enabled_is_filterable() {
        let page = Page::new("home");
        assert_eq!(
            page.filter_value("enabled"),
            Some(FilterValue::Bool(false))
        );
        assert_eq!(page.filter_value("name"), None);
    }
}
