//! Aggregated upgrade-material totals for the signed-in user.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use armory_core::{material_totals, Armor, Material, MaterialTotal, SortDir, SortKey};
use armory_store::UserInventory;

use crate::auth::require_session;
use crate::error::HttpError;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct UpgradesQuery {
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub dir: SortDir,
}

#[derive(Serialize, Deserialize)]
pub struct UpgradesResponse {
    pub materials: Vec<MaterialTotal>,
}

pub async fn get_upgrades(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(query): Query<UpgradesQuery>,
) -> Result<Json<UpgradesResponse>, HttpError> {
    let user = require_session(&state, &jar)?;

    let armors: Vec<Armor> = state.read_catalog("armors.json")?;
    let materials: Vec<Material> = state.read_catalog("materials.json")?;
    let inventory: HashMap<_, _> = state
        .store
        .with_conn(|conn| UserInventory::new(conn, &user).get_all())?
        .into_iter()
        .collect();

    let totals = material_totals(&armors, &inventory, &materials, query.sort, query.dir);
    Ok(Json(UpgradesResponse { materials: totals }))
}
