// The SQLite repositories must behave exactly like MemoryRepository

mod common;

use folio_core::errors::FolioError;
use folio_core::repo::{Direction, FilterSet, FilterValue, OrderSpec, PageWindow};
use folio_core::{Attributes, MemoryRepository, Page, Repository};
use serde_json::json;

#[test]
fn test_insert_assigns_id_and_timestamps() {
    let (_dir, store) = common::temp_store();
    let page = common::save_page(&store, "home", true, 1);

    assert_eq!(page.id, Some(1));
    assert!(page.created_at.is_some());
    assert_eq!(store.pages().find_one(1).unwrap(), Some(page));
}

#[test]
fn test_json_columns_round_trip() {
    let (_dir, store) = common::temp_store();
    let page = common::save_page(&store, "home", true, 1);

    let mut block = folio_core::Block::new(page.id.unwrap(), "text");
    let mut settings = Attributes::new();
    settings.set("content", json!("<p>hi</p>"));
    settings.set("nested", json!({"a": [1, 2]}));
    block.settings = settings;

    let saved = store.blocks().save(block).unwrap();
    let loaded = store.blocks().find_one(saved.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded.settings, saved.settings);
    assert_eq!(loaded.block_type, "text");
}

#[test]
fn test_save_unchanged_is_idempotent() {
    let (_dir, store) = common::temp_store();
    let page = common::save_page(&store, "home", true, 1);

    let again = store.pages().save(page.clone()).unwrap();
    assert_eq!(again, page);
}

#[test]
fn test_update_persists_changes() {
    let (_dir, store) = common::temp_store();
    let mut page = common::save_page(&store, "home", false, 1);
    page.title = Some("Home".to_string());
    page.enabled = true;

    let updated = store.pages().save(page.clone()).unwrap();
    let loaded = store.pages().find_one(page.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded, updated);
    assert_eq!(loaded.title.as_deref(), Some("Home"));
    assert!(loaded.enabled);
}

#[test]
fn test_update_unknown_id_is_not_found() {
    let (_dir, store) = common::temp_store();
    let mut page = Page::new("ghost");
    page.id = Some(99);
    assert!(matches!(
        store.pages().save(page),
        Err(FolioError::PageNotFound { page_id: 99 })
    ));
}

#[test]
fn test_delete_then_find_one_is_none() {
    let (_dir, store) = common::temp_store();
    let page = common::save_page(&store, "home", true, 1);

    store.pages().delete(&page).unwrap();
    assert!(store.pages().find_one(page.id.unwrap()).unwrap().is_none());
    assert!(matches!(
        store.pages().delete(&page),
        Err(FolioError::PageNotFound { .. })
    ));
}

#[test]
fn test_deleting_page_cascades_to_blocks() {
    let (_dir, store) = common::temp_store();
    let page = common::save_page(&store, "home", true, 1);
    let block = common::save_block(&store, page.id.unwrap(), "text", 1);

    store.pages().delete(&page).unwrap();
    assert!(store.blocks().find_one(block.id.unwrap()).unwrap().is_none());
}

#[test]
fn test_block_for_missing_page_is_rejected() {
    let (_dir, store) = common::temp_store();
    let result = store.blocks().save(folio_core::Block::new(404, "text"));
    assert!(matches!(result, Err(FolioError::Persistence { .. })));
}

#[test]
fn test_find_many_matches_memory_repository() {
    let (_dir, store) = common::temp_store();
    let memory = MemoryRepository::<Page>::new();
    let rows = [
        ("a", true, 3),
        ("b", false, 1),
        ("c", true, 1),
        ("d", true, 2),
        ("e", true, 1),
        ("f", false, 2),
    ];
    for (name, enabled, position) in rows {
        let sql_page = common::save_page(&store, name, enabled, position);
        let mut mem_page = Page::new(name);
        mem_page.enabled = enabled;
        mem_page.position = position;
        let mem_page = memory.save(mem_page).unwrap();
        assert_eq!(sql_page.id, mem_page.id);
    }

    let filters = FilterSet::new().with("enabled", FilterValue::Bool(true));
    let orders = [
        OrderSpec::new(),
        OrderSpec::new().then("position", Direction::Asc),
        OrderSpec::new()
            .then("position", Direction::Desc)
            .then("name", Direction::Asc),
    ];

    for order in &orders {
        for index in 0..3 {
            let window = PageWindow::new(index, 2).unwrap();
            let ids = |pages: Vec<Page>| pages.into_iter().map(|p| p.id).collect::<Vec<_>>();
            assert_eq!(
                ids(store.pages().find_many(&filters, order, window).unwrap()),
                ids(memory.find_many(&filters, order, window).unwrap()),
                "order {:?} window {:?}",
                order,
                window
            );
        }
    }
}

#[test]
fn test_blocks_filtered_by_page_and_ordered_by_position() {
    let (_dir, store) = common::temp_store();
    let home = common::save_page(&store, "home", true, 1);
    let about = common::save_page(&store, "about", true, 2);
    let b3 = common::save_block(&store, home.id.unwrap(), "text", 3);
    let b1 = common::save_block(&store, home.id.unwrap(), "menu", 1);
    common::save_block(&store, about.id.unwrap(), "text", 1);
    let b1_tie = common::save_block(&store, home.id.unwrap(), "text", 1);

    let blocks = store
        .blocks()
        .find_many(
            &FilterSet::new().with("page", home.id.unwrap()),
            &OrderSpec::new().then("position", Direction::Asc),
            PageWindow::unbounded(),
        )
        .unwrap();

    let ids: Vec<_> = blocks.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![b1.id, b1_tie.id, b3.id]);
}

#[test]
fn test_delete_where_removes_one_page_of_blocks() {
    let (_dir, store) = common::temp_store();
    let home = common::save_page(&store, "home", true, 1);
    let about = common::save_page(&store, "about", true, 2);
    common::save_block(&store, home.id.unwrap(), "text", 1);
    common::save_block(&store, home.id.unwrap(), "menu", 2);
    common::save_block(&store, about.id.unwrap(), "text", 1);

    let removed = store
        .blocks()
        .delete_where(&FilterSet::new().with("page", home.id.unwrap()))
        .unwrap();
    assert_eq!(removed, 2);

    let left = store
        .blocks()
        .find_many(&FilterSet::new(), &OrderSpec::new(), PageWindow::unbounded())
        .unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].page_id, about.id);
}

#[test]
fn test_delete_where_refuses_unscoped_delete() {
    let (_dir, store) = common::temp_store();
    let home = common::save_page(&store, "home", true, 1);
    common::save_block(&store, home.id.unwrap(), "text", 1);

    let err = store
        .blocks()
        .delete_where(&FilterSet::new().with("settings", "x"))
        .unwrap_err();
    assert!(matches!(err, FolioError::InvalidParameter { .. }));
    assert!(store.blocks().find_one(1).unwrap().is_some());
}

#[test]
fn test_unsupported_filter_is_dropped_not_matched() {
    let (_dir, store) = common::temp_store();
    common::save_page(&store, "home", true, 1);

    let filters = FilterSet::new().with("template_code", "x");
    let found = store
        .pages()
        .find_many(&filters, &OrderSpec::new(), PageWindow::unbounded())
        .unwrap();
    assert_eq!(found.len(), 1);
}
