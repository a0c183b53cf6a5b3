//! Folio Store - SQLite persistence for pages, blocks and jobs
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - `SqliteRepository<R>` implementing folio-core's `Repository` contract
//! - A durable job queue implementing `JobDispatcher`

pub mod db;
pub mod errors;
pub mod jobs;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use db::{SharedConnection, SqliteStore};
pub use errors::Result;
pub use jobs::SqliteJobQueue;
pub use repo::{SqliteBlockRepository, SqlitePageRepository, SqliteRepository};
