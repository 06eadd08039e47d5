//! Armor sheet parsing.

use std::collections::BTreeMap;

use armory_core::{Armor, ArmorSortKeys, DyeColor, Slot, UpgradeIngredient};
use armory_sheet::{Cell, Row, Workbook, Worksheet};

use crate::cells;
use crate::error::ExtractError;
use crate::headers::{slugify, HeaderMap};
use crate::icons::image_formula_url;

pub const ARMOR_SHEET: &str = "Armors";

/// Rows present in the spreadsheet but unused by the game.
const UNUSED_ARMORS: [&str; 3] = ["Armor_1036_Lower", "Armor_1036_Upper", "Armor_1152_Head"];

/// A remote icon referenced by the sheet, keyed by its output file stem.
#[derive(Debug, Clone)]
pub struct IconSource {
    pub file_stem: String,
    pub url: String,
}

/// One parsed armor row plus the icons it references.
#[derive(Debug, Clone)]
pub struct ArmorRecord {
    pub armor: Armor,
    pub icons: Vec<IconSource>,
}

/// Parse the `Armors` worksheet into catalog records.
pub fn parse_armors(workbook: &Workbook) -> Result<Vec<ArmorRecord>, ExtractError> {
    let sheet = workbook
        .worksheet(ARMOR_SHEET)
        .ok_or_else(|| ExtractError::MissingSheet(ARMOR_SHEET.to_string()))?;
    let header = header_row(sheet)?;
    let cols = HeaderMap::from_header_row(ARMOR_SHEET, header);
    for slug in [
        "actorname",
        "euen_name",
        "body_part",
        "defense_0",
        "selling_price_0",
        "icon",
    ] {
        cols.require(slug)?;
    }

    let mut records = Vec::new();
    for row in sheet.rows() {
        if row.number() == 1 || !row.has_values() {
            continue;
        }
        let Some(record) = parse_row(row, &cols)? else {
            continue;
        };
        records.push(record);
    }
    Ok(records)
}

pub(crate) fn header_row(sheet: &Worksheet) -> Result<&Row, ExtractError> {
    sheet.row(1).ok_or_else(|| {
        ExtractError::MissingColumn {
            sheet: sheet.name().to_string(),
            column: "(header row)".to_string(),
        }
    })
}

fn parse_row(row: &Row, cols: &HeaderMap) -> Result<Option<ArmorRecord>, ExtractError> {
    let actor_name = cells::required_string(row, cols, "actorname")?;
    if UNUSED_ARMORS.contains(&actor_name.as_str()) {
        return Ok(None);
    }
    let en_name = cells::required_string(row, cols, "euen_name")?;
    let body_part = cells::required_string(row, cols, "body_part")?;
    let slot: Slot = body_part
        .parse()
        .map_err(|_| ExtractError::InvalidValue {
            row: row.number(),
            column: "body_part".to_string(),
            detail: format!("unknown body part '{body_part}'"),
        })?;

    let belonging_set = cells::opt_string(row, cols, "belonging_set");
    let set_en_name = cells::opt_string(row, cols, "set_euen_name");
    let buy_price_rupees = cells::opt_u32(row, cols, "buying_price_rupees")?;
    let buy_price_poes = cells::opt_u32(row, cols, "buying_price_poes")?;
    let defenses = tier_series(row, cols, "defense")?;
    let selling_prices = tier_series(row, cols, "selling_price")?;
    let upgrades = parse_upgrades(row, cols, &actor_name)?;

    let mut colors = Vec::new();
    let mut icon_urls = BTreeMap::new();
    let mut icons = Vec::new();
    for color in DyeColor::ALL {
        let slug = icon_slug(color);
        let Some(column) = cols.get(&slug) else {
            continue;
        };
        let Some(cell) = row.cell(column) else {
            continue;
        };
        if cell.formula.is_none() && cell.value.is_empty() {
            continue;
        }
        let url = icon_url_from_cell(cell).ok_or_else(|| ExtractError::IconFormula {
            row: row.number(),
            column: slug.clone(),
        })?;
        let file_stem = format!("{actor_name}_{color}");
        colors.push(color);
        icon_urls.insert(color, format!("/images/armor/{file_stem}.avif"));
        icons.push(IconSource {
            file_stem,
            url: url.to_string(),
        });
    }

    let sort = cells::opt_u32(row, cols, "sort")?;
    let sort_keys = ArmorSortKeys {
        name: match sort {
            Some(n) => format!("{n:04}"),
            None => en_name.to_lowercase(),
        },
        body_part: format!("{:02}_{}", slot_rank(slot), slot.name()),
        set: set_en_name
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default(),
    };

    let armor = Armor {
        actor_name,
        belonging_set,
        buy_price_poes,
        buy_price_rupees,
        colors,
        defenses,
        en_name,
        has_upgrades: upgrades.is_some(),
        icon_urls,
        selling_prices,
        set_en_name,
        slot,
        sort_keys,
        upgrades,
    };
    Ok(Some(ArmorRecord { armor, icons }))
}

fn icon_slug(color: DyeColor) -> String {
    match color {
        DyeColor::Base => "icon".to_string(),
        other => format!("icon_{}", slugify(other.name())),
    }
}

fn icon_url_from_cell(cell: &Cell) -> Option<&str> {
    if let Some(formula) = &cell.formula {
        if let Some(url) = image_formula_url(formula) {
            return Some(url);
        }
    }
    cell.value.as_str().and_then(image_formula_url)
}

fn slot_rank(slot: Slot) -> u8 {
    match slot {
        Slot::Head => 0,
        Slot::Upper => 1,
        Slot::Lower => 2,
        Slot::All => 3,
    }
}

/// Collect the tier-indexed values `{prefix}_0 … {prefix}_4`, stopping
/// at the first absent tier. Tier 0 is mandatory.
fn tier_series(row: &Row, cols: &HeaderMap, prefix: &str) -> Result<Vec<u32>, ExtractError> {
    let mut values = Vec::new();
    for tier in 0..=4u8 {
        let slug = format!("{prefix}_{tier}");
        match cells::opt_u32(row, cols, &slug)? {
            Some(value) => values.push(value),
            None if tier == 0 => {
                return Err(ExtractError::MissingValue {
                    row: row.number(),
                    column: slug,
                })
            }
            None => break,
        }
    }
    Ok(values)
}

/// Read the star-tier ingredient pairs. Tiers stop at the first one with
/// no populated slot; half-filled pairs and populated tiers after an
/// empty one are malformed source data.
fn parse_upgrades(
    row: &Row,
    cols: &HeaderMap,
    actor: &str,
) -> Result<Option<Vec<Vec<UpgradeIngredient>>>, ExtractError> {
    let mut tiers: Vec<Vec<UpgradeIngredient>> = Vec::new();
    for tier in 1..=4u8 {
        let mut ingredients = Vec::new();
        for slot in 1..=3u8 {
            let material = cells::opt_string(row, cols, &format!("{tier}_material_{slot}"));
            let quantity = cells::opt_u32(row, cols, &format!("{tier}_quantity_{slot}"))?;
            match (material, quantity) {
                (Some(material), Some(quantity)) => {
                    ingredients.push(UpgradeIngredient { material, quantity })
                }
                (None, None) => {}
                (Some(material), None) => {
                    return Err(ExtractError::MalformedRecipe {
                        actor: actor.to_string(),
                        tier,
                        detail: format!("'{material}' has no quantity"),
                    })
                }
                (None, Some(quantity)) => {
                    return Err(ExtractError::MalformedRecipe {
                        actor: actor.to_string(),
                        tier,
                        detail: format!("quantity {quantity} with no material"),
                    })
                }
            }
        }
        tiers.push(ingredients);
    }

    let filled = tiers.iter().take_while(|t| !t.is_empty()).count();
    if tiers.iter().skip(filled).any(|t| !t.is_empty()) {
        return Err(ExtractError::MalformedRecipe {
            actor: actor.to_string(),
            tier: (filled + 1) as u8,
            detail: "populated tier follows an empty one".to_string(),
        });
    }
    tiers.truncate(filled);
    Ok(if tiers.is_empty() { None } else { Some(tiers) })
}
