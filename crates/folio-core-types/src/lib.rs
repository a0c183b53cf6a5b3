//! Core types shared across Folio crates
//!
//! - **Identifiers**: RequestId, JobId (UUIDv7 newtypes)
//! - **Schema constants**: canonical structured-log field keys and event names

pub mod ids;
pub mod schema;

pub use ids::{JobId, RequestId};
