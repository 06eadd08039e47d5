//! Shared handle over one SQLite connection.
//!
//! The HTTP layer holds a `Store` in its application state; handlers
//! borrow the connection for the duration of one short synchronous
//! operation.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use rusqlite::Connection;

use crate::error::StoreError;
use crate::schema;

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> Result<Store, StoreError> {
        Ok(Store {
            conn: Mutex::new(schema::open_database(path)?),
        })
    }

    /// In-memory store for tests.
    pub fn memory() -> Result<Store, StoreError> {
        Ok(Store {
            conn: Mutex::new(schema::open_memory()?),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&conn)
    }
}
