//! Router assembly and the serve loop.

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use armory_store::sessions::purge_expired;

use crate::auth;
use crate::error::{HttpError, ServeError};
use crate::routes::{catalog, inventory, upgrades};
use crate::state::SharedState;

/// Build the full application router.
pub fn router(state: SharedState) -> Router {
    let images = ServeDir::new(state.config.assets_dir.join("images"));
    Router::new()
        .route("/api/armor", get(catalog::get_armor))
        .route("/api/materials", get(catalog::get_materials))
        .route(
            "/api/inventory/armor",
            get(inventory::get_inventory).patch(inventory::patch_inventory),
        )
        .route("/api/upgrades", get(upgrades::get_upgrades))
        .route("/api/auth/login", get(auth::login))
        .route("/api/auth/callback", get(auth::callback))
        .route("/api/auth/logout", get(auth::logout))
        .nest_service("/images", images)
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> HttpError {
    HttpError::not_found("no such route")
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: SharedState) -> Result<(), ServeError> {
    state.store.with_conn(purge_expired)?;

    let listener = TcpListener::bind(&state.config.addr).await?;
    log::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
