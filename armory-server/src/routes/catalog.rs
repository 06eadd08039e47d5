//! Static catalog endpoints. No per-request computation beyond file
//! read + parse.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use armory_core::{Armor, Material};

use crate::error::HttpError;
use crate::state::SharedState;

#[derive(Serialize, Deserialize)]
pub struct ArmorListResponse {
    pub armors: Vec<Armor>,
}

#[derive(Serialize, Deserialize)]
pub struct MaterialsResponse {
    pub materials: Vec<Material>,
}

pub async fn get_armor(State(state): State<SharedState>) -> Result<Response, HttpError> {
    let armors: Vec<Armor> = state.read_catalog("armors.json")?;
    Ok((
        [(header::CACHE_CONTROL, state.config.cache_control())],
        Json(ArmorListResponse { armors }),
    )
        .into_response())
}

pub async fn get_materials(State(state): State<SharedState>) -> Result<Response, HttpError> {
    let materials: Vec<Material> = state.read_catalog("materials.json")?;
    Ok((
        [(header::CACHE_CONTROL, state.config.cache_control())],
        Json(MaterialsResponse { materials }),
    )
        .into_response())
}
