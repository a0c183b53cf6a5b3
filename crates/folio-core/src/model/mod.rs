pub mod attributes;
pub mod block;
pub mod page;

pub use attributes::Attributes;
pub use block::Block;
pub use page::Page;

/// Identifier assigned by a repository on first save
pub type ResourceId = i64;
