//! Aggregation of crafting materials needed for pending upgrades.
//!
//! Pure reduction over the in-memory catalogs and one user's inventory:
//! no I/O, no caching. The HTTP layer and the CLI both call
//! [`material_totals`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Armor, ArmorField, Material};

/// Column the aggregated result is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Type,
    Total,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// One armor's share of a material total: the piece, the tier the
/// material is consumed at, and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialContribution {
    pub armor: String,
    pub level: u8,
    pub quantity: u32,
}

/// Aggregated need for one material across every pending upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTotal {
    pub material: Material,
    pub total: u32,
    #[serde(rename = "for")]
    pub contributions: Vec<MaterialContribution>,
}

/// Compute the materials needed to finish every pending upgrade.
///
/// Considers armors present in `inventory` that have upgrade recipes,
/// expands every tier strictly above the owned level, groups the
/// resulting (material, quantity) pairs by material name in first-seen
/// order, and joins against the material catalog; pairs naming a
/// material absent from the catalog are dropped.
///
/// Ties under the requested sort key break by insertion order, and a
/// descending sort is the exact reverse of the ascending one.
pub fn material_totals(
    armors: &[Armor],
    inventory: &HashMap<String, ArmorField>,
    materials: &[Material],
    sort: SortKey,
    dir: SortDir,
) -> Vec<MaterialTotal> {
    struct Group {
        name: String,
        total: u32,
        contributions: Vec<MaterialContribution>,
    }

    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for armor in armors {
        let Some(owned) = inventory.get(&armor.actor_name) else {
            continue;
        };
        for (tier_idx, recipe) in armor.upgrade_recipes().iter().enumerate() {
            let level = (tier_idx + 1) as u8;
            if level <= owned.level {
                continue;
            }
            for ingredient in recipe {
                let slot = *index.entry(ingredient.material.clone()).or_insert_with(|| {
                    groups.push(Group {
                        name: ingredient.material.clone(),
                        total: 0,
                        contributions: Vec::new(),
                    });
                    groups.len() - 1
                });
                groups[slot].total += ingredient.quantity;
                groups[slot].contributions.push(MaterialContribution {
                    armor: armor.actor_name.clone(),
                    level,
                    quantity: ingredient.quantity,
                });
            }
        }
    }

    let by_name: HashMap<&str, &Material> =
        materials.iter().map(|m| (m.name.as_str(), m)).collect();

    let mut rows: Vec<(usize, MaterialTotal)> = groups
        .into_iter()
        .filter_map(|group| {
            let material = by_name.get(group.name.as_str())?;
            Some(MaterialTotal {
                material: (*material).clone(),
                total: group.total,
                contributions: group.contributions,
            })
        })
        .enumerate()
        .collect();

    rows.sort_by(|(a_idx, a), (b_idx, b)| {
        let ord = match sort {
            SortKey::Name => a.material.sort_keys.name.cmp(&b.material.sort_keys.name),
            SortKey::Type => a
                .material
                .sort_keys
                .type_key
                .cmp(&b.material.sort_keys.type_key),
            SortKey::Total => a.total.cmp(&b.total),
        };
        let ord = ord.then(a_idx.cmp(b_idx));
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });

    rows.into_iter().map(|(_, row)| row).collect()
}
