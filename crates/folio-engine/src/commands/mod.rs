//! Request handling layer.
//!
//! Parses raw parameters, runs the page/block operations against the
//! configured repositories and dispatcher, and owns lifecycle logging.

pub mod outcome;
pub mod page_handler;
pub mod params;

pub use outcome::{DeleteAck, SnapshotAck};
pub use page_handler::PageHandler;
pub use params::{parse_id, DeletePolicy, HandlerConfig, ListPagesParams, PageQuery};
