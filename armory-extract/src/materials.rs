//! Materials sheet parsing.

use armory_core::{Material, MaterialSortKeys};
use armory_sheet::Workbook;

use crate::armor::{header_row, IconSource};
use crate::cells;
use crate::error::ExtractError;
use crate::headers::HeaderMap;
use crate::icons::image_formula_url;

pub const MATERIAL_SHEET: &str = "Materials";

/// One parsed material row plus its icon reference.
#[derive(Debug, Clone)]
pub struct MaterialRecord {
    pub material: Material,
    pub icon: IconSource,
}

/// Parse the `Materials` worksheet into catalog records.
pub fn parse_materials(workbook: &Workbook) -> Result<Vec<MaterialRecord>, ExtractError> {
    let sheet = workbook
        .worksheet(MATERIAL_SHEET)
        .ok_or_else(|| ExtractError::MissingSheet(MATERIAL_SHEET.to_string()))?;
    let header = header_row(sheet)?;
    let cols = HeaderMap::from_header_row(MATERIAL_SHEET, header);
    for slug in ["actorname", "euen_name", "icon"] {
        cols.require(slug)?;
    }

    let mut records = Vec::new();
    for row in sheet.rows() {
        if row.number() == 1 || !row.has_values() {
            continue;
        }
        let actor_name = cells::required_string(row, &cols, "actorname")?;
        let name = cells::required_string(row, &cols, "euen_name")?;

        let icon_column = cols.require("icon")?;
        let icon_cell = row.cell(icon_column).ok_or_else(|| {
            ExtractError::MissingValue {
                row: row.number(),
                column: "icon".to_string(),
            }
        })?;
        let url = icon_cell
            .formula
            .as_deref()
            .and_then(image_formula_url)
            .or_else(|| icon_cell.value.as_str().and_then(image_formula_url))
            .ok_or_else(|| ExtractError::IconFormula {
                row: row.number(),
                column: "icon".to_string(),
            })?;

        let material_type = cells::opt_string(row, &cols, "material_type");
        let sort = cells::opt_u32(row, &cols, "sort")?;
        let sort_keys = MaterialSortKeys {
            type_key: material_type
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_default(),
            name: match sort {
                Some(n) => format!("{n:04}"),
                None => name.to_lowercase(),
            },
        };

        let material = Material {
            icon_url: format!("/images/materials/{actor_name}.avif"),
            name,
            sort_keys,
            actor_name: actor_name.clone(),
        };
        records.push(MaterialRecord {
            material,
            icon: IconSource {
                file_stem: actor_name,
                url: url.to_string(),
            },
        });
    }
    Ok(records)
}
