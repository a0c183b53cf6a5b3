#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::raw;
use folio_core::rules::{block_schema, page_schema, FieldKind, FieldRule, Schema};
use folio_core::{Block, FieldErrors, Page, SchemaValidator, Validator};
use serde_json::json;

#[test]
fn test_bind_against_existing_preserves_untouched_fields() {
    let validator = SchemaValidator::<Page>::new(page_schema());
    let mut existing = Page::new("Home");
    existing.id = Some(1);
    existing.slug = Some("home".to_string());
    existing.enabled = true;
    existing.attributes.set("seo_title", json!("Welcome"));

    let bound = validator
        .bind(Some(&existing), &raw(json!({"title": "Home page"})))
        .unwrap();

    assert_eq!(bound.title.as_deref(), Some("Home page"));
    assert_eq!(bound.slug, existing.slug);
    assert_eq!(bound.enabled, existing.enabled);
    assert_eq!(bound.attributes, existing.attributes);
    assert_eq!(bound.id, existing.id);
    assert_eq!(bound.created_at, existing.created_at);
}

#[test]
fn test_null_clears_optional_field() {
    let validator = SchemaValidator::<Page>::new(page_schema());
    let mut existing = Page::new("Home");
    existing.url = Some("/home".to_string());

    let bound = validator
        .bind(Some(&existing), &raw(json!({"url": null})))
        .unwrap();
    assert!(bound.url.is_none());
}

#[test]
fn test_null_for_required_field_is_error() {
    let validator = SchemaValidator::<Page>::new(page_schema());
    let existing = Page::new("Home");

    let errors = validator
        .bind(Some(&existing), &raw(json!({"name": null})))
        .unwrap_err();
    assert!(errors.contains("name"));
}

#[test]
fn test_identifier_cannot_be_written() {
    let validator = SchemaValidator::<Block>::new(block_schema());
    let mut existing = Block::new(1, "text");
    existing.id = Some(5);

    let errors = validator
        .bind(Some(&existing), &raw(json!({"id": 6})))
        .unwrap_err();
    assert_eq!(
        errors.get("id"),
        Some(&["This form should not contain extra fields.".to_string()][..])
    );
}

#[test]
fn test_invalid_block_reports_every_field() {
    let validator = SchemaValidator::<Block>::new(block_schema());
    let errors = validator
        .bind(
            None,
            &raw(json!({"page": "abc", "type": "", "position": "first", "settings": "x"})),
        )
        .unwrap_err();

    let fields: Vec<_> = errors.fields().collect();
    assert_eq!(fields, vec!["page", "position", "settings", "type"]);
}

#[test]
fn test_too_long_value() {
    let validator = SchemaValidator::<Block>::new(block_schema());
    let long_type = "x".repeat(65);
    let errors = validator
        .bind(None, &raw(json!({"page": 1, "type": long_type})))
        .unwrap_err();
    assert_eq!(
        errors.get("type"),
        Some(&["This value is too long. It should have 64 characters or less.".to_string()][..])
    );
}

#[test]
fn test_custom_schema_narrows_writable_fields() {
    let schema = Schema::new("page").field(
        FieldRule::new("name", FieldKind::Text)
            .required()
            .not_blank(),
    );
    let validator = SchemaValidator::<Page>::new(schema);

    assert!(validator.bind(None, &raw(json!({"name": "ok"}))).is_ok());
    let errors = validator
        .bind(None, &raw(json!({"name": "ok", "title": "nope"})))
        .unwrap_err();
    assert!(errors.contains("title"));
}

#[test]
fn test_field_errors_serialize_as_map() {
    let errors = FieldErrors::new()
        .with("name", "This value should not be blank.")
        .with("page", "This value should not be null.");
    assert_eq!(
        serde_json::to_value(&errors).unwrap(),
        json!({
            "name": ["This value should not be blank."],
            "page": ["This value should not be null."],
        })
    );
}
