use folio_core::dispatch::{JobDispatcher, MemoryJobQueue};
use folio_core::repo::{FilterSet, OrderSpec, PageWindow, Repository, Resource};
use folio_core::{Block, FolioError, MemoryRepository, Page, RawInput, Result};
use folio_engine::{HandlerConfig, PageHandler};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Repository wrapper that counts calls, for asserting what a handler touched
pub struct CountingRepository<R: Resource> {
    inner: MemoryRepository<R>,
    saves: AtomicUsize,
    queries: AtomicUsize,
}

#[allow(dead_code)]
impl<R: Resource> CountingRepository<R> {
    pub fn new() -> Self {
        Self {
            inner: MemoryRepository::new(),
            saves: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl<R: Resource> Repository<R> for CountingRepository<R> {
    fn find_one(&self, id: i64) -> Result<Option<R>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_one(id)
    }

    fn find_many(&self, filters: &FilterSet, order: &OrderSpec, window: PageWindow) -> Result<Vec<R>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_many(filters, order, window)
    }

    fn save(&self, resource: R) -> Result<R> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(resource)
    }

    fn delete(&self, resource: &R) -> Result<()> {
        self.inner.delete(resource)
    }

    fn delete_where(&self, filters: &FilterSet) -> Result<usize> {
        self.inner.delete_where(filters)
    }
}

/// Repository whose deletes fail, as a store that lost its disk would
pub struct FailingDeletes<R: Resource> {
    inner: MemoryRepository<R>,
}

#[allow(dead_code)]
impl<R: Resource> FailingDeletes<R> {
    pub fn new() -> Self {
        Self {
            inner: MemoryRepository::new(),
        }
    }
}

impl<R: Resource> Repository<R> for FailingDeletes<R> {
    fn find_one(&self, id: i64) -> Result<Option<R>> {
        self.inner.find_one(id)
    }

    fn find_many(&self, filters: &FilterSet, order: &OrderSpec, window: PageWindow) -> Result<Vec<R>> {
        self.inner.find_many(filters, order, window)
    }

    fn save(&self, resource: R) -> Result<R> {
        self.inner.save(resource)
    }

    fn delete(&self, _resource: &R) -> Result<()> {
        Err(FolioError::persistence("delete", "disk full"))
    }

    fn delete_where(&self, _filters: &FilterSet) -> Result<usize> {
        Err(FolioError::persistence("delete_where", "disk full"))
    }
}

/// Handler over in-memory collaborators, with handles kept for assertions
#[allow(dead_code)]
pub struct Fixture {
    pub handler: PageHandler,
    pub pages: Arc<CountingRepository<Page>>,
    pub blocks: Arc<CountingRepository<Block>>,
    pub jobs: Arc<MemoryJobQueue>,
}

#[allow(dead_code)]
pub fn fixture() -> Fixture {
    fixture_with(HandlerConfig::default(), Arc::new(MemoryJobQueue::new()))
}

#[allow(dead_code)]
pub fn fixture_with(config: HandlerConfig, jobs: Arc<MemoryJobQueue>) -> Fixture {
    let pages = Arc::new(CountingRepository::<Page>::new());
    let blocks = Arc::new(CountingRepository::<Block>::new());
    let handler = PageHandler::with_default_validators(
        pages.clone(),
        blocks.clone(),
        jobs.clone() as Arc<dyn JobDispatcher>,
        config,
    );
    Fixture {
        handler,
        pages,
        blocks,
        jobs,
    }
}

#[allow(dead_code)]
pub fn raw(value: Value) -> RawInput {
    match value {
        Value::Object(map) => map,
        other => panic!("raw input must be a JSON object, got {}", other),
    }
}

#[allow(dead_code)]
pub fn create_page(handler: &PageHandler, name: &str, enabled: bool, position: i64) -> Page {
    handler
        .write_page(
            None,
            &raw(serde_json::json!({
                "name": name,
                "enabled": enabled,
                "position": position,
            })),
        )
        .unwrap()
}

#[allow(dead_code)]
pub fn create_block(handler: &PageHandler, page_id: i64, block_type: &str, position: i64) -> Block {
    handler
        .write_block(
            None,
            &raw(serde_json::json!({
                "page": page_id,
                "type": block_type,
                "position": position,
            })),
        )
        .unwrap()
}
