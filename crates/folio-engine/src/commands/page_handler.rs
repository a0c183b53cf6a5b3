//! Page and block request handler with boundary logging.
//!
//! `PageHandler` composes the repositories, validators and job dispatcher
//! into the operations a transport layer exposes:
//! - List, get, write and delete pages
//! - List, write and delete a page's blocks
//! - Queue snapshot generation for a page
//!
//! ## Logging Ownership
//!
//! Every public operation owns its lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.
//!
//! ## Errors
//!
//! Operations return `ExError`, tagged with the operation name and a fresh
//! `RequestId`; `ExError::status_code()` gives the response code.

use std::sync::Arc;
use std::time::Instant;

use folio_core::dispatch::{JobDispatcher, JobRequest};
use folio_core::errors::{ExError, FolioError, Result};
use folio_core::repo::{Direction, FilterSet, OrderSpec, PageWindow, Repository};
use folio_core::rules::{block_schema, page_schema, FieldErrors, RawInput, SchemaValidator, Validator};
use folio_core::{log_op_end, log_op_error, log_op_start};
use folio_core::{Block, Page, ResourceId};
use folio_core_types::RequestId;
use folio_store::SqliteStore;
use serde_json::json;

use super::outcome::{DeleteAck, SnapshotAck};
use super::params::{DeletePolicy, HandlerConfig, ListPagesParams};

pub struct PageHandler {
    pages: Arc<dyn Repository<Page>>,
    blocks: Arc<dyn Repository<Block>>,
    page_validator: Arc<dyn Validator<Page>>,
    block_validator: Arc<dyn Validator<Block>>,
    dispatcher: Arc<dyn JobDispatcher>,
    config: HandlerConfig,
}

impl PageHandler {
    pub fn new(
        pages: Arc<dyn Repository<Page>>,
        blocks: Arc<dyn Repository<Block>>,
        page_validator: Arc<dyn Validator<Page>>,
        block_validator: Arc<dyn Validator<Block>>,
        dispatcher: Arc<dyn JobDispatcher>,
        config: HandlerConfig,
    ) -> Self {
        Self {
            pages,
            blocks,
            page_validator,
            block_validator,
            dispatcher,
            config,
        }
    }

    /// Handler using the default page and block schemas
    pub fn with_default_validators(
        pages: Arc<dyn Repository<Page>>,
        blocks: Arc<dyn Repository<Block>>,
        dispatcher: Arc<dyn JobDispatcher>,
        config: HandlerConfig,
    ) -> Self {
        Self::new(
            pages,
            blocks,
            Arc::new(SchemaValidator::<Page>::new(page_schema())),
            Arc::new(SchemaValidator::<Block>::new(block_schema())),
            dispatcher,
            config,
        )
    }

    /// Handler over a SQLite store, dispatching to its durable job queue
    pub fn from_store(store: &SqliteStore, config: HandlerConfig) -> Self {
        Self::with_default_validators(
            Arc::new(store.pages()),
            Arc::new(store.blocks()),
            Arc::new(store.jobs()),
            config,
        )
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// List pages with filtering, ordering and pagination
    ///
    /// # Errors
    ///
    /// - `InvalidParameter`: malformed `page`, `count`, `enabled` or `orderBy`;
    ///   the repository is not queried
    /// - `Persistence`: repository failure
    pub fn list_pages(&self, params: &ListPagesParams) -> std::result::Result<Vec<Page>, ExError> {
        let request_id = RequestId::new();
        log_op_start!("list_pages", request_id = %request_id);
        let start = Instant::now();

        let pages = self
            .list_pages_impl(params)
            .map_err(|e| fail("list_pages", &request_id, start, e))?;

        log_op_end!(
            "list_pages",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            result_len = pages.len()
        );
        Ok(pages)
    }

    fn list_pages_impl(&self, params: &ListPagesParams) -> Result<Vec<Page>> {
        let query = params.parse(&self.config)?;
        self.pages
            .find_many(&query.filters, &query.order, query.window)
    }

    /// Get a single page
    ///
    /// # Errors
    ///
    /// - `NotFound`: "Page (id) not found"
    /// - `Persistence`: repository failure
    pub fn get_page(&self, page_id: ResourceId) -> std::result::Result<Page, ExError> {
        let request_id = RequestId::new();
        log_op_start!("get_page", request_id = %request_id, page_id = page_id);
        let start = Instant::now();

        let page = self
            .require_page(page_id)
            .map_err(|e| fail("get_page", &request_id, start, e))?;

        log_op_end!(
            "get_page",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id
        );
        Ok(page)
    }

    /// Blocks of a page, by position then id
    ///
    /// # Errors
    ///
    /// - `NotFound`: the page does not exist
    /// - `Persistence`: repository failure
    pub fn get_page_blocks(&self, page_id: ResourceId) -> std::result::Result<Vec<Block>, ExError> {
        let request_id = RequestId::new();
        log_op_start!("get_page_blocks", request_id = %request_id, page_id = page_id);
        let start = Instant::now();

        let blocks = self
            .require_page(page_id)
            .and_then(|_| self.blocks_of(page_id))
            .map_err(|e| fail("get_page_blocks", &request_id, start, e))?;

        log_op_end!(
            "get_page_blocks",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            result_len = blocks.len()
        );
        Ok(blocks)
    }

    /// Create (`block_id = None`) or update a block from raw input
    ///
    /// On update only the supplied fields change. Nothing is saved unless
    /// the whole input validates and the owning page exists.
    ///
    /// # Errors
    ///
    /// - `NotFound`: updating an unknown block
    /// - `ValidationFailed`: field errors, including an unknown `page`
    /// - `Persistence`: repository failure
    pub fn write_block(
        &self,
        block_id: Option<ResourceId>,
        raw: &RawInput,
    ) -> std::result::Result<Block, ExError> {
        let request_id = RequestId::new();
        log_op_start!("write_block", request_id = %request_id, block_id = ?block_id);
        let start = Instant::now();

        let block = self
            .write_block_impl(block_id, raw)
            .map_err(|e| fail("write_block", &request_id, start, e))?;

        log_op_end!(
            "write_block",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            block_id = ?block.id
        );
        Ok(block)
    }

    fn write_block_impl(&self, block_id: Option<ResourceId>, raw: &RawInput) -> Result<Block> {
        let existing = match block_id {
            Some(id) => Some(
                self.blocks
                    .find_one(id)?
                    .ok_or(FolioError::BlockNotFound { block_id: id })?,
            ),
            None => None,
        };

        let block = self
            .block_validator
            .bind(existing.as_ref(), raw)
            .map_err(|errors| invalid("block", errors))?;

        if let Some(page_id) = block.page_id {
            if self.pages.find_one(page_id)?.is_none() {
                return Err(invalid(
                    "block",
                    FieldErrors::new().with("page", format!("Page ({}) not found", page_id)),
                ));
            }
        }

        self.blocks.save(block)
    }

    /// Delete a block
    ///
    /// # Errors
    ///
    /// - `NotFound`: unknown block
    /// - `Persistence`: repository failure
    pub fn delete_block(&self, block_id: ResourceId) -> std::result::Result<DeleteAck, ExError> {
        let request_id = RequestId::new();
        log_op_start!("delete_block", request_id = %request_id, block_id = block_id);
        let start = Instant::now();

        self.blocks
            .find_one(block_id)
            .and_then(|found| found.ok_or(FolioError::BlockNotFound { block_id }))
            .and_then(|block| self.blocks.delete(&block))
            .map_err(|e| fail("delete_block", &request_id, start, e))?;

        log_op_end!(
            "delete_block",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id
        );
        Ok(DeleteAck::deleted())
    }

    /// Create (`page_id = None`) or update a page from raw input
    ///
    /// # Errors
    ///
    /// - `NotFound`: updating an unknown page
    /// - `ValidationFailed`: field errors
    /// - `Persistence`: repository failure
    pub fn write_page(
        &self,
        page_id: Option<ResourceId>,
        raw: &RawInput,
    ) -> std::result::Result<Page, ExError> {
        let request_id = RequestId::new();
        log_op_start!("write_page", request_id = %request_id, page_id = ?page_id);
        let start = Instant::now();

        let page = self
            .write_page_impl(page_id, raw)
            .map_err(|e| fail("write_page", &request_id, start, e))?;

        log_op_end!(
            "write_page",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            page_id = ?page.id
        );
        Ok(page)
    }

    fn write_page_impl(&self, page_id: Option<ResourceId>, raw: &RawInput) -> Result<Page> {
        let existing = match page_id {
            Some(id) => Some(self.require_page(id)?),
            None => None,
        };

        let page = self
            .page_validator
            .bind(existing.as_ref(), raw)
            .map_err(|errors| invalid("page", errors))?;

        self.pages.save(page)
    }

    /// Delete a page, applying the configured [`DeletePolicy`] to its blocks
    ///
    /// # Errors
    ///
    /// - `NotFound`: unknown page
    /// - `Conflict` (`PageNotEmpty`): blocks remain under `RejectIfNonEmpty`
    /// - `Persistence`: repository failure
    pub fn delete_page(&self, page_id: ResourceId) -> std::result::Result<DeleteAck, ExError> {
        let request_id = RequestId::new();
        log_op_start!("delete_page", request_id = %request_id, page_id = page_id);
        let start = Instant::now();

        let removed_blocks = self
            .delete_page_impl(page_id)
            .map_err(|e| fail("delete_page", &request_id, start, e))?;

        log_op_end!(
            "delete_page",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            removed_blocks = removed_blocks
        );
        Ok(DeleteAck::deleted())
    }

    fn delete_page_impl(&self, page_id: ResourceId) -> Result<usize> {
        let page = self.require_page(page_id)?;
        let owned = FilterSet::new().with("page", page_id);
        let block_count = self
            .blocks
            .find_many(&owned, &OrderSpec::new(), PageWindow::unbounded())?
            .len();

        if block_count > 0 && self.config.delete_policy == DeletePolicy::RejectIfNonEmpty {
            return Err(FolioError::PageNotEmpty {
                page_id,
                block_count,
            });
        }

        // Blocks are only reachable through their page, so the page goes
        // first: if that fails nothing has changed. Stores with a foreign-key
        // cascade have already dropped the blocks by the time this runs.
        self.pages.delete(&page)?;
        let removed = self.blocks.delete_where(&owned)?;
        tracing::debug!(page_id, block_count, removed, "page blocks removed");
        Ok(block_count)
    }

    /// Queue snapshot generation for a page
    ///
    /// Returns as soon as the job is accepted; the snapshot itself is built
    /// later by whatever consumes the queue.
    ///
    /// # Errors
    ///
    /// - `NotFound`: unknown page (nothing is queued)
    /// - `DispatchFailed`: the queue refused the job
    pub fn request_snapshot(&self, page_id: ResourceId) -> std::result::Result<SnapshotAck, ExError> {
        let request_id = RequestId::new();
        log_op_start!("request_snapshot", request_id = %request_id, page_id = page_id);
        let start = Instant::now();

        let ack = self
            .request_snapshot_impl(page_id)
            .map_err(|e| fail("request_snapshot", &request_id, start, e))?;

        log_op_end!(
            "request_snapshot",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            job_id = %ack.job_id
        );
        Ok(ack)
    }

    fn request_snapshot_impl(&self, page_id: ResourceId) -> Result<SnapshotAck> {
        self.require_page(page_id)?;
        let ack = self.dispatcher.dispatch(JobRequest::new(
            self.config.snapshot_job.clone(),
            json!({ "pageId": page_id }),
        ))?;
        Ok(SnapshotAck {
            queued: true,
            job_id: ack.job_id,
            page_id,
        })
    }

    fn require_page(&self, page_id: ResourceId) -> Result<Page> {
        self.pages
            .find_one(page_id)?
            .ok_or(FolioError::PageNotFound { page_id })
    }

    fn blocks_of(&self, page_id: ResourceId) -> Result<Vec<Block>> {
        self.blocks.find_many(
            &FilterSet::new().with("page", page_id),
            &OrderSpec::new().then("position", Direction::Asc),
            PageWindow::unbounded(),
        )
    }
}

fn invalid(resource: &str, errors: FieldErrors) -> FolioError {
    FolioError::ValidationFailed {
        resource: resource.to_string(),
        errors,
    }
}

/// Log the failure and attach operation context
fn fail(op: &'static str, request_id: &RequestId, start: Instant, e: FolioError) -> ExError {
    log_op_error!(
        op,
        e.clone(),
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = %request_id
    );
    ExError::from(e)
        .with_op(op)
        .with_request_id(request_id.clone())
}
