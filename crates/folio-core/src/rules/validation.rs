//! Bind raw client input onto a resource
//!
//! Validation never touches a repository: `bind` either yields a fully
//! merged resource ready to save, or the complete set of field errors.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use super::schema::{Schema, MSG_EXTRA_FIELD};

/// Untyped client payload, keyed by wire field name
pub type RawInput = Map<String, Value>;

/// Messages per field name
///
/// Errors that concern the payload as a whole are filed under
/// [`FieldErrors::GLOBAL`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub const GLOBAL: &'static str = "_global";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Number of fields with at least one message
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

/// Turns raw input into a resource, or explains why it cannot
pub trait Validator<R>: Send + Sync {
    /// Merge `raw` onto `existing` (or a fresh default) and validate
    ///
    /// Fields absent from `raw` keep their current values.
    ///
    /// # Errors
    ///
    /// Returns every field error found; nothing is half-applied.
    fn bind(&self, existing: Option<&R>, raw: &RawInput) -> std::result::Result<R, FieldErrors>;
}

/// [`Validator`] driven by a declarative [`Schema`]
///
/// Works on the resource's serde form: the current value is serialized,
/// normalized input is overlaid field by field, constraints are checked on
/// the merged object and the result is deserialized back.
pub struct SchemaValidator<R> {
    schema: Schema,
    _resource: PhantomData<fn() -> R>,
}

impl<R> SchemaValidator<R> {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            _resource: PhantomData,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl<R> fmt::Debug for SchemaValidator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema", &self.schema)
            .finish()
    }
}

impl<R> Validator<R> for SchemaValidator<R>
where
    R: Serialize + DeserializeOwned + Default,
{
    fn bind(&self, existing: Option<&R>, raw: &RawInput) -> std::result::Result<R, FieldErrors> {
        let mut errors = FieldErrors::new();

        let current = match existing {
            Some(resource) => serde_json::to_value(resource),
            None => serde_json::to_value(R::default()),
        };
        let mut merged = match current {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(errors.with(FieldErrors::GLOBAL, "Resource is not an object."));
            }
            Err(e) => return Err(errors.with(FieldErrors::GLOBAL, e.to_string())),
        };

        for (key, value) in raw {
            let Some(rule) = self.schema.rule(key) else {
                errors.add(key.as_str(), MSG_EXTRA_FIELD);
                continue;
            };
            match rule.normalize(value) {
                Ok(normalized) => {
                    merged.insert(rule.target.to_string(), normalized);
                }
                Err(message) => errors.add(rule.name, message),
            }
        }

        for rule in self.schema.rules() {
            if errors.contains(rule.name) {
                continue;
            }
            for message in rule.check(merged.get(rule.target)) {
                errors.add(rule.name, message);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        serde_json::from_value(Value::Object(merged))
            .map_err(|e| FieldErrors::new().with(FieldErrors::GLOBAL, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Page};
    use crate::rules::schema::{block_schema, page_schema, MSG_NOT_BLANK, MSG_NOT_NULL};
    use serde_json::json;

    fn raw(value: Value) -> RawInput {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    fn pages() -> SchemaValidator<Page> {
        SchemaValidator::new(page_schema())
    }

    #[test]
    fn test_bind_new_page() {
        let page = pages()
            .bind(None, &raw(json!({"name": "Home", "enabled": "1", "position": "3"})))
            .unwrap();
        assert_eq!(page.name, "Home");
        assert!(page.enabled);
        assert_eq!(page.position, 3);
        assert!(page.id.is_none());
    }

    #[test]
    fn test_missing_name_on_create() {
        let errors = pages().bind(None, &raw(json!({"title": "x"}))).unwrap_err();
        assert_eq!(errors.get("name"), Some(&[MSG_NOT_BLANK.to_string()][..]));
    }

    #[test]
    fn test_partial_update_keeps_untouched_fields() {
        let mut existing = Page::new("About");
        existing.id = Some(4);
        existing.title = Some("About us".to_string());

        let updated = pages()
            .bind(Some(&existing), &raw(json!({"slug": "about"})))
            .unwrap();
        assert_eq!(updated.id, Some(4));
        assert_eq!(updated.name, "About");
        assert_eq!(updated.title.as_deref(), Some("About us"));
        assert_eq!(updated.slug.as_deref(), Some("about"));
    }

    #[test]
    fn test_extra_fields_are_rejected() {
        let errors = pages()
            .bind(None, &raw(json!({"name": "x", "id": 9, "bogus": true})))
            .unwrap_err();
        assert!(errors.contains("id"));
        assert!(errors.contains("bogus"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_all_errors_reported_together() {
        let errors = pages()
            .bind(
                None,
                &raw(json!({"name": "", "enabled": "maybe", "position": -2})),
            )
            .unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.get("enabled"),
            Some(&["This value should be of type bool.".to_string()][..])
        );
    }

    #[test]
    fn test_block_page_reference_maps_to_page_id() {
        let blocks = SchemaValidator::<Block>::new(block_schema());
        let block = blocks
            .bind(None, &raw(json!({"page": 5, "type": "text", "settings": {"content": "hi"}})))
            .unwrap();
        assert_eq!(block.page_id, Some(5));
        assert_eq!(block.settings.get("content"), Some(&json!("hi")));

        let errors = blocks.bind(None, &raw(json!({"type": "text"}))).unwrap_err();
        assert_eq!(errors.get("page"), Some(&[MSG_NOT_NULL.to_string()][..]));
    }

    #[test]
    fn test_display_lists_fields() {
        let errors = FieldErrors::new()
            .with("name", "a")
            .with("name", "b")
            .with("type", "c");
        assert_eq!(errors.to_string(), "name: a b; type: c");
    }
}
