pub mod schema;
pub mod validation;

pub use schema::{block_schema, page_schema, FieldKind, FieldRule, Schema};
pub use validation::{FieldErrors, RawInput, SchemaValidator, Validator};
