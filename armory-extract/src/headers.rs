//! Header-row resolution.
//!
//! Sheet headers are slugified once per sheet and looked up by fixed slug
//! names, so a renamed spreadsheet column fails loudly instead of
//! silently shifting fields. Star glyph runs collapse to their count
//! ("Selling Price ★★" → `selling_price_2`), and the base-tier columns
//! map onto the tier-0 slugs explicitly.

use std::collections::HashMap;

use armory_sheet::{CellValue, Row};

use crate::error::ExtractError;

/// Slugify a header cell: lowercase, star runs → their length, other
/// non-alphanumeric runs → `_`, no leading/trailing separator.
pub fn slugify(header: &str) -> String {
    let mut collapsed = String::with_capacity(header.len());
    let mut stars = 0usize;
    for c in header.chars() {
        if c == '★' {
            stars += 1;
            continue;
        }
        if stars > 0 {
            collapsed.push_str(&stars.to_string());
            stars = 0;
        }
        collapsed.push(c);
    }
    if stars > 0 {
        collapsed.push_str(&stars.to_string());
    }

    let mut slug = String::with_capacity(collapsed.len());
    let mut pending_sep = false;
    for c in collapsed.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Map a header to its field slug. The base-tier columns have their own
/// names in the sheet but share the indexed key space with the starred
/// tiers.
pub fn field_slug(header: &str) -> String {
    let slug = slugify(header);
    match slug.as_str() {
        "base_defense" => "defense_0".to_string(),
        "base_selling_price" => "selling_price_0".to_string(),
        _ => slug,
    }
}

/// Resolved columns of one sheet: field slug → 0-based column index.
#[derive(Debug)]
pub struct HeaderMap {
    sheet: String,
    columns: HashMap<String, usize>,
}

impl HeaderMap {
    /// Build the mapping from a header row. Later duplicates of a slug
    /// are ignored; the first column wins.
    pub fn from_header_row(sheet: &str, header: &Row) -> HeaderMap {
        let mut columns = HashMap::new();
        for cell in header.cells() {
            let CellValue::Text(text) = &cell.value else {
                continue;
            };
            columns
                .entry(field_slug(text))
                .or_insert(cell.column);
        }
        HeaderMap {
            sheet: sheet.to_string(),
            columns,
        }
    }

    /// Column index for a slug, if the sheet has it.
    pub fn get(&self, slug: &str) -> Option<usize> {
        self.columns.get(slug).copied()
    }

    /// Column index for a slug that the run cannot proceed without.
    pub fn require(&self, slug: &str) -> Result<usize, ExtractError> {
        self.get(slug).ok_or_else(|| ExtractError::MissingColumn {
            sheet: self.sheet.clone(),
            column: slug.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{field_slug, slugify};

    #[test]
    fn slugs() {
        assert_eq!(slugify("ActorName"), "actorname");
        assert_eq!(slugify("EUen name"), "euen_name");
        assert_eq!(slugify("Buying Price (Rupees)"), "buying_price_rupees");
        assert_eq!(slugify("Selling Price ★★"), "selling_price_2");
        assert_eq!(slugify("★★★ Material 2"), "3_material_2");
        assert_eq!(slugify("  Body Part "), "body_part");
    }

    #[test]
    fn base_tier_columns_map_to_tier_zero() {
        assert_eq!(field_slug("Base Defense"), "defense_0");
        assert_eq!(field_slug("Base Selling Price"), "selling_price_0");
        assert_eq!(field_slug("Defense ★"), "defense_1");
    }
}
