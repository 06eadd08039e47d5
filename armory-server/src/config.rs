//! Server configuration.

use std::path::PathBuf;

/// OAuth application credentials for the Discord provider.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Absolute URL Discord redirects back to (our callback route).
    pub redirect_url: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Deployment environment; `dev` relaxes catalog caching.
    pub env: String,
    pub addr: String,
    pub db_path: PathBuf,
    /// Root of the extracted static assets (`data/`, `images/`).
    pub assets_dir: PathBuf,
    /// `None` disables the auth routes (inventory becomes unreachable).
    pub discord: Option<DiscordConfig>,
    pub session_ttl_days: i64,
}

impl ServerConfig {
    pub fn is_dev(&self) -> bool {
        self.env == "dev"
    }

    /// Catalog responses are immutable between extraction runs, so they
    /// cache aggressively outside dev.
    pub fn cache_control(&self) -> &'static str {
        if self.is_dev() {
            "no-cache"
        } else {
            "public, max-age=900"
        }
    }
}
