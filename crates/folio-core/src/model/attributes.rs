use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque key-value storage for resource data the core does not interpret
///
/// Used for page attributes and block settings. Keys are kept sorted so the
/// serialized form is stable across saves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Attributes {
    data: BTreeMap<String, serde_json::Value>,
}

impl Attributes {
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Attributes {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            data: map.into_iter().collect(),
        }
    }
}

impl From<Attributes> for serde_json::Map<String, serde_json::Value> {
    fn from(attributes: Attributes) -> Self {
        attributes.data.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_remove() {
        let mut attrs = Attributes::new();
        attrs.set("title", json!("Home"));
        assert_eq!(attrs.get("title"), Some(&json!("Home")));
        assert_eq!(attrs.len(), 1);

        assert_eq!(attrs.remove("title"), Some(json!("Home")));
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_object_with_sorted_keys() {
        let mut attrs = Attributes::new();
        attrs.set("zeta", json!(1));
        attrs.set("alpha", json!(2));
        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(json, r#"{"alpha":2,"zeta":1}"#);
    }
}
