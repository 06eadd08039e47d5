//! Spreadsheet → static asset extraction pipeline.
//!
//! Reads the armor/material workbook (a local file or a published
//! Google Sheet export), parses the catalogs out of it by header name,
//! fetches and converts the referenced icons, and writes the JSON +
//! image assets the web API serves.

pub mod armor;
pub mod cells;
pub mod error;
pub mod fetch;
pub mod headers;
pub mod icons;
pub mod materials;
pub mod pipeline;
pub mod worker_pool;

pub use armor::{parse_armors, ArmorRecord, IconSource, ARMOR_SHEET};
pub use error::ExtractError;
pub use fetch::download_workbook;
pub use icons::{convert_all, IconJob, IconOutcome, IconStatus, DEFAULT_CONCURRENCY};
pub use materials::{parse_materials, MaterialRecord, MATERIAL_SHEET};
pub use pipeline::{
    plan_icon_jobs, prune_failed_colors, run, write_catalogs, AssetPaths, ExtractReport,
};
