//! `armory serve`: start the REST API server.

use std::path::PathBuf;

use armory_server::{AppState, DiscordConfig, ServerConfig};
use armory_store::Store;

use crate::error::CliError;

pub(crate) async fn run(
    addr: String,
    db: PathBuf,
    env: String,
    session_ttl: i64,
    assets_root: PathBuf,
) -> Result<(), CliError> {
    let discord = discord_from_env(&addr);
    if discord.is_none() {
        log::warn!(
            "DISCORD_CLIENT_ID / DISCORD_CLIENT_SECRET not set; sign-in is disabled"
        );
    }

    let store = Store::open(&db)?;
    let config = ServerConfig {
        env,
        addr,
        db_path: db,
        assets_dir: assets_root,
        discord,
        session_ttl_days: session_ttl,
    };
    let state = AppState::new(config, store)?;
    armory_server::serve(state).await?;
    Ok(())
}

/// OAuth credentials come from the environment only, never flags.
fn discord_from_env(addr: &str) -> Option<DiscordConfig> {
    let client_id = std::env::var("DISCORD_CLIENT_ID").ok()?;
    let client_secret = std::env::var("DISCORD_CLIENT_SECRET").ok()?;
    let redirect_url = std::env::var("ARMORY_OAUTH_REDIRECT")
        .unwrap_or_else(|_| format!("http://{addr}/api/auth/callback"));
    Some(DiscordConfig {
        client_id,
        client_secret,
        redirect_url,
    })
}
