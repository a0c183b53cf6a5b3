use folio_core::{Block, MemoryRepository, Page, RawInput, Repository};
use serde_json::Value;

/// Turn a `json!({...})` literal into raw input
#[allow(dead_code)]
pub fn raw(value: Value) -> RawInput {
    match value {
        Value::Object(map) => map,
        other => panic!("raw input must be a JSON object, got {}", other),
    }
}

/// Save one page per `(name, enabled, position)` and return them in insert order
#[allow(dead_code)]
pub fn seed_pages(repo: &MemoryRepository<Page>, pages: &[(&str, bool, i64)]) -> Vec<Page> {
    pages
        .iter()
        .map(|(name, enabled, position)| {
            let mut page = Page::new(*name);
            page.enabled = *enabled;
            page.position = *position;
            repo.save(page).unwrap()
        })
        .collect()
}

/// Save a block of the given type and position on `page_id`
#[allow(dead_code)]
pub fn seed_block(
    repo: &MemoryRepository<Block>,
    page_id: i64,
    block_type: &str,
    position: i64,
) -> Block {
    let mut block = Block::new(page_id, block_type);
    block.position = position;
    repo.save(block).unwrap()
}
