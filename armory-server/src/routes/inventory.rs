//! Per-user inventory endpoints.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use armory_core::{ArmorField, ArmorFieldValue};
use armory_store::UserInventory;

use crate::auth::require_session;
use crate::error::HttpError;
use crate::state::SharedState;

#[derive(Serialize, Deserialize)]
pub struct InventoryArmorResponse {
    pub armor: BTreeMap<String, ArmorField>,
}

/// PATCH body: a partial map of actor name → field. `null` deletes the
/// entry; values may use either field encoding, but what gets stored is
/// always the structured form.
#[derive(Deserialize)]
pub struct InventoryArmorPatch {
    pub armor: BTreeMap<String, Option<ArmorFieldValue>>,
}

pub async fn get_inventory(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Json<InventoryArmorResponse>, HttpError> {
    let user = require_session(&state, &jar)?;
    let armor = state
        .store
        .with_conn(|conn| UserInventory::new(conn, &user).get_all())?;
    Ok(Json(InventoryArmorResponse { armor }))
}

pub async fn patch_inventory(
    State(state): State<SharedState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<Json<InventoryArmorResponse>, HttpError> {
    let user = require_session(&state, &jar)?;

    // The whole body must validate before any store mutation happens.
    let patch: InventoryArmorPatch = serde_json::from_slice(&body)
        .map_err(|e| HttpError::bad_request(format!("invalid patch body: {e}")))?;
    let mut fields: BTreeMap<String, Option<ArmorField>> = BTreeMap::new();
    for (actor_name, value) in patch.armor {
        let field = value.map(ArmorFieldValue::into_field);
        if let Some(field) = &field {
            field
                .validate()
                .map_err(|e| HttpError::bad_request(format!("{actor_name}: {e}")))?;
        }
        fields.insert(actor_name, field);
    }

    let armor = state.store.with_conn(|conn| {
        let inventory = UserInventory::new(conn, &user);
        inventory.set_many(&fields)?;
        inventory.get_all()
    })?;
    Ok(Json(InventoryArmorResponse { armor }))
}
