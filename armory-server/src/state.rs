//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use armory_store::Store;
use serde::de::DeserializeOwned;

use crate::config::ServerConfig;
use crate::error::HttpError;

pub struct AppState {
    pub config: ServerConfig,
    pub store: Store,
    pub http: reqwest::Client,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: ServerConfig, store: Store) -> Result<SharedState, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Arc::new(AppState {
            config,
            store,
            http,
        }))
    }

    fn data_path(&self, file: &str) -> PathBuf {
        self.config.assets_dir.join("data").join(file)
    }

    /// Load a generated catalog file. There is no per-request work here
    /// beyond read + parse; a missing or corrupt file is an internal
    /// error (the extraction run produces these, not the client).
    pub fn read_catalog<T: DeserializeOwned>(&self, file: &str) -> Result<T, HttpError> {
        let path = self.data_path(file);
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            log::error!("catalog read failed for {}: {e}", path.display());
            HttpError::internal(format!("catalog {file} unavailable"))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            log::error!("catalog parse failed for {}: {e}", path.display());
            HttpError::internal(format!("catalog {file} is corrupt"))
        })
    }
}
