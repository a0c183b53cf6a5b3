use folio_core::{Block, Page, Repository};
use folio_store::SqliteStore;
use tempfile::TempDir;

/// Store backed by a file in a fresh temp dir; keep the dir alive for the test
#[allow(dead_code)]
pub fn temp_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("folio.db")).unwrap();
    (dir, store)
}

#[allow(dead_code)]
pub fn save_page(store: &SqliteStore, name: &str, enabled: bool, position: i64) -> Page {
    let mut page = Page::new(name);
    page.enabled = enabled;
    page.position = position;
    store.pages().save(page).unwrap()
}

#[allow(dead_code)]
pub fn save_block(store: &SqliteStore, page_id: i64, block_type: &str, position: i64) -> Block {
    let mut block = Block::new(page_id, block_type);
    block.position = position;
    store.blocks().save(block).unwrap()
}
