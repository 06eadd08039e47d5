//! REST API for the armory companion app.
//!
//! Stateless request handlers over the generated catalog assets and the
//! per-user inventory store, plus the OAuth session plumbing. Errors
//! surface in a fixed 400/401/404/500 taxonomy with a uniform JSON
//! body.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use app::{router, serve};
pub use config::{DiscordConfig, ServerConfig};
pub use error::{HttpError, ServeError};
pub use state::{AppState, SharedState};
