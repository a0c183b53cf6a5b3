use folio_core::errors::{ExError, ExErrorKind, FolioError};
use folio_core::FieldErrors;
use folio_core_types::RequestId;

#[test]
fn test_not_found_verifiable_by_kind() {
    let ex_err: ExError = FolioError::BlockNotFound { block_id: 12 }.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    assert_eq!(ex_err.status_code(), 404);
    assert_eq!(ex_err.entity_id(), Some("12"));
}

#[test]
fn test_page_not_empty_is_conflict() {
    let ex_err: ExError = FolioError::PageNotEmpty {
        page_id: 3,
        block_count: 2,
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::Conflict);
    assert_eq!(ex_err.status_code(), 409);
    assert!(ex_err.message().contains("2 block(s)"));
}

#[test]
fn test_dispatch_failed_is_distinct_from_persistence() {
    let dispatch: ExError = FolioError::DispatchFailed {
        job_name: "create_snapshot".to_string(),
        reason: "down".to_string(),
    }
    .into();
    let persistence: ExError = FolioError::persistence("save", "disk full").into();

    assert_eq!(dispatch.status_code(), 503);
    assert_eq!(persistence.status_code(), 500);
    assert_ne!(dispatch.code(), persistence.code());
    assert_eq!(persistence.op(), Some("save"));
}

#[test]
fn test_validation_failed_carries_field_errors() {
    let errors = FieldErrors::new().with("type", "This value should not be blank.");
    let ex_err: ExError = FolioError::ValidationFailed {
        resource: "block".to_string(),
        errors: errors.clone(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::ValidationFailed);
    assert_eq!(ex_err.status_code(), 400);
    assert_eq!(ex_err.field_errors(), Some(&errors));
}

#[test]
fn test_builder_attaches_request_context() {
    let request_id = RequestId::new();
    let ex_err = ExError::new(ExErrorKind::InvalidParameter)
        .with_op("list_pages")
        .with_request_id(request_id.clone())
        .with_message("bad count");

    assert_eq!(ex_err.op(), Some("list_pages"));
    assert_eq!(ex_err.request_id(), Some(&request_id));
    assert_eq!(ex_err.message(), "bad count");
    assert!(ex_err.to_string().contains("ERR_INVALID_PARAMETER"));
}
