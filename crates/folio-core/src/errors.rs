use folio_core_types::RequestId;
use thiserror::Error;

use crate::model::ResourceId;
use crate::rules::FieldErrors;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure a caller can observe is classified into one of these kinds.
/// Each kind has a stable code and a response status so the boundary layer
/// can render distinct outcomes without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Malformed filter/order/pagination/identifier input
    InvalidParameter,
    /// Identifier does not resolve to an existing resource
    NotFound,
    /// Bound input failed field-level validation
    ValidationFailed,
    /// Operation conflicts with current state (e.g. deleting a non-empty page)
    Conflict,
    /// Job queue could not accept a job
    DispatchFailed,

    // Storage and encoding
    Persistence,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidParameter => "ERR_INVALID_PARAMETER",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ValidationFailed => "ERR_VALIDATION_FAILED",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::DispatchFailed => "ERR_DISPATCH_FAILED",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }

    /// Response status the boundary layer should use for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ExErrorKind::InvalidParameter | ExErrorKind::ValidationFailed => 400,
            ExErrorKind::NotFound => 404,
            ExErrorKind::Conflict => 409,
            ExErrorKind::DispatchFailed => 503,
            ExErrorKind::Persistence | ExErrorKind::Serialization => 500,
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus enough context (operation, entity,
/// request correlation, per-field errors) for a boundary layer to render a
/// response and for logs to be joined back to the request.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    field_errors: Option<FieldErrors>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            field_errors: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach per-field validation errors
    pub fn with_field_errors(mut self, errors: FieldErrors) -> Self {
        self.field_errors = Some(errors);
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Per-field errors, populated for `ValidationFailed`
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        self.field_errors.as_ref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(errors) = &self.field_errors {
            write!(f, " ({})", errors)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for Folio operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FolioError {
    #[error("Page ({page_id}) not found")]
    PageNotFound { page_id: ResourceId },

    #[error("Block ({block_id}) not found")]
    BlockNotFound { block_id: ResourceId },

    /// Raw input could not be bound to a valid resource
    #[error("Invalid {resource} input: {errors}")]
    ValidationFailed {
        resource: String,
        errors: FieldErrors,
    },

    /// A query or path parameter was rejected before reaching a repository
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Page deletion refused because blocks still reference it
    #[error("Page ({page_id}) still owns {block_count} block(s)")]
    PageNotEmpty {
        page_id: ResourceId,
        block_count: usize,
    },

    #[error("Job '{job_name}' could not be queued: {reason}")]
    DispatchFailed { job_name: String, reason: String },

    #[error("Persistence error in {op}: {reason}")]
    Persistence { op: String, reason: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl FolioError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        FolioError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn persistence(op: impl Into<String>, reason: impl Into<String>) -> Self {
        FolioError::Persistence {
            op: op.into(),
            reason: reason.into(),
        }
    }
}

impl From<FolioError> for ExError {
    fn from(err: FolioError) -> Self {
        let message = err.to_string();
        match err {
            FolioError::PageNotFound { page_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(page_id.to_string())
                .with_message(message),

            FolioError::BlockNotFound { block_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(block_id.to_string())
                .with_message(message),

            FolioError::ValidationFailed { errors, .. } => {
                ExError::new(ExErrorKind::ValidationFailed)
                    .with_message(message)
                    .with_field_errors(errors)
            }

            FolioError::InvalidParameter { .. } => {
                ExError::new(ExErrorKind::InvalidParameter).with_message(message)
            }

            FolioError::PageNotEmpty { page_id, .. } => ExError::new(ExErrorKind::Conflict)
                .with_entity_id(page_id.to_string())
                .with_message(message),

            FolioError::DispatchFailed { .. } => {
                ExError::new(ExErrorKind::DispatchFailed).with_message(message)
            }

            // The store-level op stays in the message; `op` is the boundary's
            FolioError::Persistence { .. } => {
                ExError::new(ExErrorKind::Persistence).with_message(message)
            }

            FolioError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::Serialization {
            message: err.to_string(),
        }
    }
}
