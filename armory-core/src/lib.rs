//! Shared data model for the armory companion app.
//!
//! Everything here serializes to the JSON shapes the web client consumes:
//! the static armor/material catalogs produced by the extraction pipeline,
//! the per-user inventory records, and the aggregated upgrade-material
//! totals.

pub mod model;
pub mod upgrades;

pub use model::{
    Armor, ArmorField, ArmorFieldValue, ArmorSortKeys, DyeColor, FieldError, Material,
    MaterialSortKeys, Slot, UnknownName, UpgradeIngredient, MAX_LEVEL,
};
pub use upgrades::{material_totals, MaterialContribution, MaterialTotal, SortDir, SortKey};
