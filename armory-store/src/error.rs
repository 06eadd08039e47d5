use thiserror::Error;

/// Errors from the inventory/session store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A persisted inventory value that neither encoding can decode
    #[error("Corrupt inventory value: {0}")]
    Field(#[from] armory_core::FieldError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt timestamp in store: {0}")]
    Timestamp(String),

    #[error("Schema version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}
