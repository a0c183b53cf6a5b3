//! Acknowledgements returned by operations that have no resource to return

use folio_core::ResourceId;
use folio_core_types::JobId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteAck {
    pub deleted: bool,
}

impl DeleteAck {
    pub fn deleted() -> Self {
        Self { deleted: true }
    }
}

/// The snapshot job was queued; it has not run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotAck {
    pub queued: bool,
    pub job_id: JobId,
    pub page_id: ResourceId,
}
