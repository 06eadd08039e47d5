use std::collections::HashSet;

use armory_core::{DyeColor, Slot};
use armory_extract::{
    parse_armors, parse_materials, prune_failed_colors, write_catalogs, AssetPaths,
    ExtractError,
};
use armory_sheet::{CellSpec, Workbook, XlsxBuilder};

const ARMOR_HEADERS: [&str; 28] = [
    "ActorName",
    "EUen name",
    "Belonging Set",
    "Set (EUen name)",
    "Body Part",
    "Buying Price (Rupees)",
    "Buying Price (Poes)",
    "Base Defense",
    "Defense ★",
    "Defense ★★",
    "Defense ★★★",
    "Defense ★★★★",
    "Base Selling Price",
    "Selling Price ★",
    "Selling Price ★★",
    "Selling Price ★★★",
    "Selling Price ★★★★",
    "Icon",
    "Icon Blue",
    "★ Material 1",
    "★ Quantity 1",
    "★★ Material 1",
    "★★ Quantity 1",
    "★★★ Material 1",
    "★★★ Quantity 1",
    "★★★★ Material 1",
    "★★★★ Quantity 1",
    "Sort",
];

fn header_row() -> Vec<CellSpec> {
    ARMOR_HEADERS.iter().map(|h| CellSpec::text(*h)).collect()
}

fn icon_formula(name: &str) -> CellSpec {
    CellSpec::formula(format!("IMAGE(\"https://img.example/{name}.png\")"))
}

fn hylian_hood_row() -> Vec<CellSpec> {
    vec![
        CellSpec::text("Armor_001_Head"),
        CellSpec::text("Hylian Hood"),
        CellSpec::text("Set_001"),
        CellSpec::text("Hylian Set"),
        CellSpec::text("Head"),
        CellSpec::number(60.0),
        CellSpec::text("-"),
        CellSpec::number(3.0),
        CellSpec::number(5.0),
        CellSpec::number(8.0),
        CellSpec::number(12.0),
        CellSpec::number(20.0),
        CellSpec::number(10.0),
        CellSpec::number(20.0),
        CellSpec::number(40.0),
        CellSpec::number(80.0),
        CellSpec::number(160.0),
        icon_formula("hood_base"),
        icon_formula("hood_blue"),
        CellSpec::text("Bokoblin Horn"),
        CellSpec::number(2.0),
        CellSpec::text("Bokoblin Horn"),
        CellSpec::number(3.0),
        CellSpec::text("Bokoblin Horn"),
        CellSpec::number(4.0),
        CellSpec::text("Bokoblin Horn"),
        CellSpec::number(5.0),
        CellSpec::number(1.0),
    ]
}

fn workbook_with_armor_rows(rows: Vec<Vec<CellSpec>>) -> Workbook {
    let mut builder = XlsxBuilder::new();
    let armors = builder.add_sheet("Armors");
    armors.row(header_row());
    for row in rows {
        armors.row(row);
    }
    let materials = builder.add_sheet("Materials");
    materials.row(vec![
        CellSpec::text("ActorName"),
        CellSpec::text("EUen name"),
        CellSpec::text("Icon"),
        CellSpec::text("Material Type"),
        CellSpec::text("Sort"),
    ]);
    materials.row(vec![
        CellSpec::text("Item_Horn"),
        CellSpec::text("Bokoblin Horn"),
        icon_formula("horn"),
        CellSpec::text("Monster Parts"),
        CellSpec::number(12.0),
    ]);
    Workbook::from_bytes(&builder.finish().unwrap()).unwrap()
}

#[test]
fn parses_a_full_armor_row() {
    let workbook = workbook_with_armor_rows(vec![hylian_hood_row()]);
    let records = parse_armors(&workbook).unwrap();
    assert_eq!(records.len(), 1);

    let armor = &records[0].armor;
    assert_eq!(armor.actor_name, "Armor_001_Head");
    assert_eq!(armor.en_name, "Hylian Hood");
    assert_eq!(armor.belonging_set.as_deref(), Some("Set_001"));
    assert_eq!(armor.set_en_name.as_deref(), Some("Hylian Set"));
    assert_eq!(armor.slot, Slot::Head);
    assert_eq!(armor.buy_price_rupees, Some(60));
    assert_eq!(armor.buy_price_poes, None); // "-" means no value
    assert_eq!(armor.defenses, vec![3, 5, 8, 12, 20]);
    assert_eq!(armor.selling_prices, vec![10, 20, 40, 80, 160]);
    assert!(armor.has_upgrades);

    let upgrades = armor.upgrades.as_ref().unwrap();
    assert_eq!(upgrades.len(), 4);
    let quantities: Vec<u32> = upgrades.iter().map(|t| t[0].quantity).collect();
    assert_eq!(quantities, vec![2, 3, 4, 5]);

    assert_eq!(armor.colors, vec![DyeColor::Base, DyeColor::Blue]);
    assert_eq!(
        armor.icon_urls.get(&DyeColor::Base).map(String::as_str),
        Some("/images/armor/Armor_001_Head_Base.avif")
    );
    assert_eq!(armor.sort_keys.name, "0001");
    assert_eq!(armor.sort_keys.body_part, "00_head");

    let icons = &records[0].icons;
    assert_eq!(icons.len(), 2);
    assert_eq!(icons[0].url, "https://img.example/hood_base.png");
}

#[test]
fn skips_unused_actor_rows() {
    let mut unused = hylian_hood_row();
    unused[0] = CellSpec::text("Armor_1036_Upper");
    let workbook = workbook_with_armor_rows(vec![unused]);
    assert!(parse_armors(&workbook).unwrap().is_empty());
}

#[test]
fn trailing_tiers_may_stop_early() {
    let mut row = hylian_hood_row();
    // Wipe defenses/prices past tier 2 and recipes past tier 1
    for idx in [10, 11, 15, 16] {
        row[idx] = CellSpec::Empty;
    }
    for idx in 21..=26 {
        row[idx] = CellSpec::Empty;
    }
    let workbook = workbook_with_armor_rows(vec![row]);
    let records = parse_armors(&workbook).unwrap();
    let armor = &records[0].armor;
    assert_eq!(armor.defenses, vec![3, 5, 8]);
    assert_eq!(armor.selling_prices, vec![10, 20, 40]);
    assert_eq!(armor.upgrades.as_ref().unwrap().len(), 1);
}

#[test]
fn armor_without_recipes_has_no_upgrades() {
    let mut row = hylian_hood_row();
    for idx in 19..=26 {
        row[idx] = CellSpec::Empty;
    }
    let workbook = workbook_with_armor_rows(vec![row]);
    let armor = &parse_armors(&workbook).unwrap()[0].armor;
    assert!(!armor.has_upgrades);
    assert!(armor.upgrades.is_none());
}

#[test]
fn missing_required_column_is_fatal() {
    let mut builder = XlsxBuilder::new();
    let armors = builder.add_sheet("Armors");
    // No "EUen name" header
    armors.row(vec![
        CellSpec::text("ActorName"),
        CellSpec::text("Body Part"),
        CellSpec::text("Base Defense"),
        CellSpec::text("Base Selling Price"),
        CellSpec::text("Icon"),
    ]);
    let workbook = Workbook::from_bytes(&builder.finish().unwrap()).unwrap();
    let err = parse_armors(&workbook).unwrap_err();
    assert!(
        matches!(err, ExtractError::MissingColumn { ref column, .. } if column == "euen_name"),
        "unexpected error: {err}"
    );
}

#[test]
fn half_filled_ingredient_pair_is_fatal() {
    let mut row = hylian_hood_row();
    row[20] = CellSpec::Empty; // ★ Quantity 1 gone, ★ Material 1 still set
    let workbook = workbook_with_armor_rows(vec![row]);
    let err = parse_armors(&workbook).unwrap_err();
    assert!(matches!(err, ExtractError::MalformedRecipe { tier: 1, .. }));
}

#[test]
fn populated_tier_after_empty_tier_is_fatal() {
    let mut row = hylian_hood_row();
    row[19] = CellSpec::Empty; // tier 1 emptied, tiers 2-4 remain
    row[20] = CellSpec::Empty;
    let workbook = workbook_with_armor_rows(vec![row]);
    let err = parse_armors(&workbook).unwrap_err();
    assert!(matches!(err, ExtractError::MalformedRecipe { tier: 1, .. }));
}

#[test]
fn icon_cell_without_image_formula_is_fatal() {
    let mut row = hylian_hood_row();
    row[17] = CellSpec::formula("HYPERLINK(\"https://img.example/hood.png\")");
    let workbook = workbook_with_armor_rows(vec![row]);
    let err = parse_armors(&workbook).unwrap_err();
    assert!(matches!(err, ExtractError::IconFormula { .. }));
}

#[test]
fn parses_materials() {
    let workbook = workbook_with_armor_rows(vec![hylian_hood_row()]);
    let records = parse_materials(&workbook).unwrap();
    assert_eq!(records.len(), 1);

    let material = &records[0].material;
    assert_eq!(material.actor_name, "Item_Horn");
    assert_eq!(material.name, "Bokoblin Horn");
    assert_eq!(material.icon_url, "/images/materials/Item_Horn.avif");
    assert_eq!(material.sort_keys.type_key, "monster parts");
    assert_eq!(material.sort_keys.name, "0012");
    assert_eq!(records[0].icon.url, "https://img.example/horn.png");
}

#[test]
fn pruning_drops_failed_colors_everywhere() {
    let workbook = workbook_with_armor_rows(vec![hylian_hood_row()]);
    let mut records = parse_armors(&workbook).unwrap();

    let failed: HashSet<String> = ["Armor_001_Head_Blue".to_string()].into();
    prune_failed_colors(&mut records, &failed);

    let armor = &records[0].armor;
    assert_eq!(armor.colors, vec![DyeColor::Base]);
    assert!(!armor.icon_urls.contains_key(&DyeColor::Blue));
    assert_eq!(records[0].icons.len(), 1);
}

#[tokio::test]
async fn full_run_without_images_writes_catalogs() {
    let workbook = workbook_with_armor_rows(vec![hylian_hood_row()]);
    let dir = tempfile::tempdir().unwrap();
    let assets = AssetPaths::new(dir.path().join("public"));

    let report = armory_extract::run(
        &workbook,
        &assets,
        &dir.path().join("cache"),
        4,
        true,
        |_| {},
    )
    .await
    .unwrap();

    assert_eq!(report.armors, 1);
    assert_eq!(report.materials, 1);
    assert_eq!(report.icons_converted + report.icons_reused + report.icons_failed, 0);
    assert!(assets.armors_json().exists());
    assert!(assets.materials_json().exists());
}

#[test]
fn written_catalogs_use_client_field_names() {
    let workbook = workbook_with_armor_rows(vec![hylian_hood_row()]);
    let armors = parse_armors(&workbook).unwrap();
    let materials = parse_materials(&workbook).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let assets = AssetPaths::new(dir.path());
    write_catalogs(&assets, &armors, &materials).unwrap();

    let armors_json = std::fs::read_to_string(assets.armors_json()).unwrap();
    assert!(armors_json.contains("\"actorName\""));
    assert!(armors_json.contains("\"hasUpgrades\""));
    assert!(armors_json.contains("\"sortKeys\""));

    let materials_json = std::fs::read_to_string(assets.materials_json()).unwrap();
    assert!(materials_json.contains("\"iconUrl\""));
    assert!(materials_json.contains("\"type\": \"monster parts\""));
}
