//! Declarative field rules for the write pipeline
//!
//! A [`Schema`] lists the fields a client may write for one resource type and
//! the constraints on each. Anything not listed is rejected as an extra field,
//! which is also what keeps identifiers and timestamps read-only.

use serde_json::Value;

pub const MSG_EXTRA_FIELD: &str = "This form should not contain extra fields.";
pub const MSG_NOT_BLANK: &str = "This value should not be blank.";
pub const MSG_NOT_NULL: &str = "This value should not be null.";
pub const MSG_INVALID_REFERENCE: &str = "This value is not a valid identifier.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    Integer,
    /// Identifier of another resource (integer, at least 1)
    Reference,
    /// Opaque JSON object
    Object,
}

impl FieldKind {
    fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Bool => "bool",
            FieldKind::Integer | FieldKind::Reference => "int",
            FieldKind::Object => "object",
        }
    }
}

/// Constraints for one writable field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    /// Name in raw input and in field errors
    pub name: &'static str,
    /// Name in the resource's serialized form
    pub target: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub not_blank: bool,
    pub max_length: Option<usize>,
    pub min: Option<i64>,
}

impl FieldRule {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            target: name,
            kind,
            required: false,
            not_blank: false,
            max_length: None,
            min: None,
        }
    }

    pub fn maps_to(mut self, target: &'static str) -> Self {
        self.target = target;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn not_blank(mut self) -> Self {
        self.not_blank = true;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Type-check a supplied value and coerce it to the target's shape
    ///
    /// Form-style inputs are accepted: `"1"`/`"0"` and `1`/`0` for bools,
    /// numeric strings for integers. `null` clears text and reference
    /// fields, unchecks bools and empties objects.
    pub(crate) fn normalize(&self, value: &Value) -> std::result::Result<Value, String> {
        let type_error = || format!("This value should be of type {}.", self.kind.type_name());

        match (self.kind, value) {
            (FieldKind::Text | FieldKind::Reference, Value::Null) => Ok(Value::Null),
            (FieldKind::Bool, Value::Null) => Ok(Value::Bool(false)),
            (FieldKind::Object, Value::Null) => Ok(Value::Object(serde_json::Map::new())),
            (FieldKind::Integer, Value::Null) => Err(MSG_NOT_NULL.to_string()),

            (FieldKind::Text, Value::String(_)) => Ok(value.clone()),

            (FieldKind::Bool, Value::Bool(_)) => Ok(value.clone()),
            (FieldKind::Bool, Value::Number(n)) => match n.as_i64() {
                Some(0) => Ok(Value::Bool(false)),
                Some(1) => Ok(Value::Bool(true)),
                _ => Err(type_error()),
            },
            (FieldKind::Bool, Value::String(s)) => match s.as_str() {
                "0" | "false" => Ok(Value::Bool(false)),
                "1" | "true" => Ok(Value::Bool(true)),
                _ => Err(type_error()),
            },

            (FieldKind::Integer, _) => as_integer(value).map(Value::from).ok_or_else(type_error),

            (FieldKind::Reference, _) => match as_integer(value) {
                Some(id) if id >= 1 => Ok(Value::from(id)),
                Some(_) => Err(MSG_INVALID_REFERENCE.to_string()),
                None => Err(type_error()),
            },

            (FieldKind::Object, Value::Object(_)) => Ok(value.clone()),

            _ => Err(type_error()),
        }
    }

    /// Check presence and value constraints on the merged value
    pub(crate) fn check(&self, value: Option<&Value>) -> Vec<String> {
        let mut messages = Vec::new();
        let value = value.unwrap_or(&Value::Null);

        if value.is_null() {
            if self.required {
                messages.push(if self.kind == FieldKind::Text {
                    MSG_NOT_BLANK.to_string()
                } else {
                    MSG_NOT_NULL.to_string()
                });
            }
            return messages;
        }

        if let Value::String(s) = value {
            if self.not_blank && s.trim().is_empty() {
                messages.push(MSG_NOT_BLANK.to_string());
            }
            if let Some(max) = self.max_length {
                if s.chars().count() > max {
                    messages.push(format!(
                        "This value is too long. It should have {} characters or less.",
                        max
                    ));
                }
            }
        }

        if let (Some(min), Some(n)) = (self.min, value.as_i64()) {
            if n < min {
                messages.push(format!("This value should be {} or more.", min));
            }
        }

        messages
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The writable surface of one resource type
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    resource: &'static str,
    rules: Vec<FieldRule>,
}

impl Schema {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            rules: Vec::new(),
        }
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }
}

/// Default writable fields for pages
pub fn page_schema() -> Schema {
    Schema::new("page")
        .field(
            FieldRule::new("name", FieldKind::Text)
                .required()
                .not_blank()
                .max_length(255),
        )
        .field(FieldRule::new("title", FieldKind::Text).max_length(255))
        .field(FieldRule::new("slug", FieldKind::Text).max_length(255))
        .field(FieldRule::new("url", FieldKind::Text).max_length(255))
        .field(FieldRule::new("template_code", FieldKind::Text).max_length(255))
        .field(FieldRule::new("route_name", FieldKind::Text).max_length(255))
        .field(FieldRule::new("enabled", FieldKind::Bool))
        .field(FieldRule::new("position", FieldKind::Integer).min(0))
        .field(FieldRule::new("attributes", FieldKind::Object))
}

/// Default writable fields for blocks
pub fn block_schema() -> Schema {
    Schema::new("block")
        .field(
            FieldRule::new("page", FieldKind::Reference)
                .maps_to("page_id")
                .required(),
        )
        .field(FieldRule::new("name", FieldKind::Text).max_length(255))
        .field(
            FieldRule::new("type", FieldKind::Text)
                .required()
                .not_blank()
                .max_length(64),
        )
        .field(FieldRule::new("settings", FieldKind::Object))
        .field(FieldRule::new("position", FieldKind::Integer).min(0))
        .field(FieldRule::new("enabled", FieldKind::Bool))
}
