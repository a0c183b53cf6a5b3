//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str!

/// Migration metadata
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// Get all embedded migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_pages_blocks",
            sql: include_str!("../../migrations/001_pages_blocks.sql"),
        },
        Migration {
            id: "002_jobs",
            sql: include_str!("../../migrations/002_jobs.sql"),
        },
    ]
}
