//! Per-user inventory and session persistence.
//!
//! Backed by embedded SQLite. The inventory table keeps the hash-map
//! contract of the managed key-value store the original deployment
//! delegated to: fields are JSON-encoded per armor, patches apply
//! per-field with last-write-wins, and keys are derived from a hash of
//! the user's identity rather than the identity itself.

pub mod error;
pub mod inventory;
pub mod schema;
pub mod sessions;
pub mod store;
pub mod user;

pub use error::StoreError;
pub use inventory::{UserInventory, ARMOR_AREA};
pub use schema::{create_schema, open_database, open_memory};
pub use sessions::{create_session, delete_session, get_session, purge_expired, Session};
pub use store::Store;
pub use user::{user_prefix, User};
