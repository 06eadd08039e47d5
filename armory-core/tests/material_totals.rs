use std::collections::{BTreeMap, HashMap};

use armory_core::{
    material_totals, Armor, ArmorField, ArmorSortKeys, DyeColor, Material, MaterialSortKeys,
    Slot, SortDir, SortKey, UpgradeIngredient,
};

fn armor(actor: &str, upgrades: Option<Vec<Vec<(&str, u32)>>>) -> Armor {
    let upgrades = upgrades.map(|tiers| {
        tiers
            .into_iter()
            .map(|tier| {
                tier.into_iter()
                    .map(|(material, quantity)| UpgradeIngredient {
                        material: material.to_string(),
                        quantity,
                    })
                    .collect()
            })
            .collect()
    });
    Armor {
        actor_name: actor.to_string(),
        belonging_set: None,
        buy_price_poes: None,
        buy_price_rupees: None,
        colors: vec![DyeColor::Base],
        defenses: vec![3, 5, 8, 12, 20],
        en_name: actor.to_string(),
        has_upgrades: upgrades.is_some(),
        icon_urls: BTreeMap::new(),
        selling_prices: vec![10, 20, 40, 80, 160],
        set_en_name: None,
        slot: Slot::Head,
        sort_keys: ArmorSortKeys {
            name: actor.to_lowercase(),
            body_part: "00_head".to_string(),
            set: String::new(),
        },
        upgrades,
    }
}

fn material(name: &str, type_key: &str) -> Material {
    Material {
        actor_name: format!("Item_{name}"),
        icon_url: format!("/images/materials/Item_{name}.avif"),
        name: name.to_string(),
        sort_keys: MaterialSortKeys {
            type_key: type_key.to_string(),
            name: name.to_lowercase(),
        },
    }
}

fn owned(actor: &str, level: u8) -> (String, ArmorField) {
    (
        actor.to_string(),
        ArmorField {
            level,
            dye: DyeColor::Base,
        },
    )
}

#[test]
fn pending_tiers_only() {
    let armors = vec![armor(
        "Armor_001_Head",
        Some(vec![
            vec![("Horn", 2)],
            vec![("Horn", 3)],
            vec![("Horn", 4)],
            vec![("Horn", 5)],
        ]),
    )];
    let materials = vec![material("Horn", "monster")];
    let inventory: HashMap<_, _> = [owned("Armor_001_Head", 1)].into();

    let totals = material_totals(&armors, &inventory, &materials, SortKey::Name, SortDir::Asc);
    assert_eq!(totals.len(), 1);
    let horn = &totals[0];
    assert_eq!(horn.total, 12); // 3 + 4 + 5, tier 1 already done
    assert_eq!(horn.contributions.len(), 3);
    let levels: Vec<u8> = horn.contributions.iter().map(|c| c.level).collect();
    assert_eq!(levels, vec![2, 3, 4]);
}

#[test]
fn unowned_and_fully_upgraded_armors_contribute_nothing() {
    let armors = vec![
        armor("Armor_A", Some(vec![vec![("Horn", 2)]])),
        armor("Armor_B", Some(vec![vec![("Horn", 9)]])),
    ];
    let materials = vec![material("Horn", "monster")];
    // A is maxed out, B is not owned at all
    let inventory: HashMap<_, _> = [owned("Armor_A", 4)].into();

    let totals = material_totals(&armors, &inventory, &materials, SortKey::Name, SortDir::Asc);
    assert!(totals.is_empty());
}

#[test]
fn materials_missing_from_catalog_are_dropped() {
    let armors = vec![armor(
        "Armor_A",
        Some(vec![vec![("Horn", 2), ("Mystery Goo", 9)]]),
    )];
    let materials = vec![material("Horn", "monster")];
    let inventory: HashMap<_, _> = [owned("Armor_A", 0)].into();

    let totals = material_totals(&armors, &inventory, &materials, SortKey::Name, SortDir::Asc);
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].material.name, "Horn");
}

#[test]
fn groups_across_armors_with_insertion_order() {
    let armors = vec![
        armor("Armor_A", Some(vec![vec![("Horn", 2), ("Gem", 1)]])),
        armor("Armor_B", Some(vec![vec![("Horn", 5)]])),
    ];
    let materials = vec![material("Horn", "monster"), material("Gem", "ore")];
    let inventory: HashMap<_, _> = [owned("Armor_A", 0), owned("Armor_B", 0)].into();

    let totals = material_totals(&armors, &inventory, &materials, SortKey::Total, SortDir::Asc);
    assert_eq!(totals[0].material.name, "Gem");
    assert_eq!(totals[1].material.name, "Horn");
    assert_eq!(totals[1].total, 7);
    assert_eq!(
        totals[1]
            .contributions
            .iter()
            .map(|c| c.armor.as_str())
            .collect::<Vec<_>>(),
        vec!["Armor_A", "Armor_B"]
    );
}

#[test]
fn descending_is_the_exact_reverse_of_ascending() {
    // Three materials with the same total so ordering rests on the tie-break
    let armors = vec![armor(
        "Armor_A",
        Some(vec![vec![("Horn", 3), ("Gem", 3), ("Fang", 3)]]),
    )];
    let materials = vec![
        material("Horn", "monster"),
        material("Gem", "ore"),
        material("Fang", "monster"),
    ];
    let inventory: HashMap<_, _> = [owned("Armor_A", 0)].into();

    let asc = material_totals(&armors, &inventory, &materials, SortKey::Total, SortDir::Asc);
    let mut desc =
        material_totals(&armors, &inventory, &materials, SortKey::Total, SortDir::Desc);
    desc.reverse();
    assert_eq!(asc, desc);
}

#[test]
fn sorts_by_type_key() {
    let armors = vec![armor(
        "Armor_A",
        Some(vec![vec![("Horn", 1), ("Gem", 1)]]),
    )];
    let materials = vec![material("Horn", "z-monster"), material("Gem", "a-ore")];
    let inventory: HashMap<_, _> = [owned("Armor_A", 0)].into();

    let totals = material_totals(&armors, &inventory, &materials, SortKey::Type, SortDir::Asc);
    assert_eq!(totals[0].material.name, "Gem");
}
