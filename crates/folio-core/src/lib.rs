//! Folio Core - pages, blocks and the contracts around them
//!
//! This crate provides the storage-agnostic pieces of the content service:
//! - Page and Block models
//! - The `Repository` contract with filtering, ordering and windowing, plus
//!   an in-memory implementation
//! - The write pipeline that binds raw input onto resources (`rules`)
//! - The `JobDispatcher` contract for deferred work
//! - Output shaping groups
//! - Error and logging facilities shared by the other crates

pub mod dispatch;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod output;
pub mod repo;
pub mod rules;

// Used by the logging macros
#[doc(hidden)]
pub use folio_core_types;
#[doc(hidden)]
pub use tracing;

// Re-export commonly used types
pub use dispatch::{JobAck, JobDispatcher, JobRequest, MemoryJobQueue, NoopJobDispatcher};
pub use errors::{ExError, ExErrorKind, FolioError, Result};
pub use model::{Attributes, Block, Page, ResourceId};
pub use repo::{
    Direction, FilterSet, FilterValue, MemoryRepository, OrderSpec, PageWindow, Repository,
    Resource,
};
pub use rules::{FieldErrors, RawInput, SchemaValidator, Validator};
