//! Error handling for folio-store
//!
//! Maps SQLite and filesystem failures onto folio-core's `Persistence` kind

use folio_core::errors::FolioError;

/// Result type alias shared with folio-core repositories
pub type Result<T> = folio_core::Result<T>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> FolioError {
    FolioError::persistence(
        "migration",
        format!("Migration {} failed: {}", migration_id, reason),
    )
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> FolioError {
    FolioError::persistence(
        "migration_checksum",
        format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ),
    )
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> FolioError {
    FolioError::persistence("sqlite", err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> FolioError {
    FolioError::persistence(operation, err.to_string())
}

/// Create an error for a connection mutex poisoned by a panicking holder
pub fn lock_poisoned(operation: &str) -> FolioError {
    FolioError::persistence(operation, "connection lock poisoned")
}
