//! Folio Engine - Request handling layer
//!
//! Provides the page/block request handler that coordinates the core
//! repository, validation and dispatch contracts with a persistence backend.

pub mod commands;

pub use commands::{DeleteAck, DeletePolicy, HandlerConfig, ListPagesParams, PageHandler, SnapshotAck};
