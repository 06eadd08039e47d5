use std::collections::BTreeMap;

use armory_core::{ArmorField, DyeColor};
use armory_store::{open_memory, user_prefix, User, UserInventory};
use rusqlite::params;

fn test_user() -> User {
    User {
        id: "discord:1234567890".to_string(),
        name: "link".to_string(),
        avatar_url: None,
    }
}

fn patch(
    entries: Vec<(&str, Option<ArmorField>)>,
) -> BTreeMap<String, Option<ArmorField>> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[test]
fn set_then_get_round_trips() {
    let conn = open_memory().unwrap();
    let user = test_user();
    let inventory = UserInventory::new(&conn, &user);

    let field = ArmorField {
        level: 2,
        dye: DyeColor::Crimson,
    };
    inventory
        .set_many(&patch(vec![("Armor_001_Head", Some(field))]))
        .unwrap();

    assert_eq!(inventory.get("Armor_001_Head").unwrap(), Some(field));
    let all = inventory.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all["Armor_001_Head"], field);
}

#[test]
fn null_patch_value_removes_the_field() {
    let conn = open_memory().unwrap();
    let user = test_user();
    let inventory = UserInventory::new(&conn, &user);

    let field = ArmorField {
        level: 1,
        dye: DyeColor::Base,
    };
    inventory
        .set_many(&patch(vec![
            ("Armor_001_Head", Some(field)),
            ("Armor_002_Upper", Some(field)),
        ]))
        .unwrap();
    inventory
        .set_many(&patch(vec![("Armor_001_Head", None)]))
        .unwrap();

    let all = inventory.get_all().unwrap();
    assert!(!all.contains_key("Armor_001_Head"));
    assert!(all.contains_key("Armor_002_Upper"));
    assert_eq!(inventory.get("Armor_001_Head").unwrap(), None);
}

#[test]
fn upsert_overwrites_per_field() {
    let conn = open_memory().unwrap();
    let user = test_user();
    let inventory = UserInventory::new(&conn, &user);

    let first = ArmorField {
        level: 0,
        dye: DyeColor::Base,
    };
    let second = ArmorField {
        level: 3,
        dye: DyeColor::Navy,
    };
    inventory
        .set_many(&patch(vec![("Armor_001_Head", Some(first))]))
        .unwrap();
    inventory
        .set_many(&patch(vec![("Armor_001_Head", Some(second))]))
        .unwrap();

    assert_eq!(inventory.get("Armor_001_Head").unwrap(), Some(second));
}

#[test]
fn legacy_bare_integer_values_decode_with_base_dye() {
    let conn = open_memory().unwrap();
    let user = test_user();

    // A value written by the oldest client generation
    conn.execute(
        "INSERT INTO inventory (user_prefix, area, field, value, updated_at)
         VALUES (?1, 'armor', 'Armor_009_Lower', '3', '2023-06-01T00:00:00Z')",
        params![user_prefix(&user)],
    )
    .unwrap();

    let inventory = UserInventory::new(&conn, &user);
    let field = inventory.get("Armor_009_Lower").unwrap().unwrap();
    assert_eq!(field.level, 3);
    assert_eq!(field.dye, DyeColor::Base);

    // Re-writing it persists the structured form
    inventory
        .set_many(&patch(vec![("Armor_009_Lower", Some(field))]))
        .unwrap();
    let raw: String = conn
        .query_row(
            "SELECT value FROM inventory WHERE field = 'Armor_009_Lower'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(raw, r#"{"level":3,"dye":"Base"}"#);
}

#[test]
fn corrupt_values_surface_as_errors() {
    let conn = open_memory().unwrap();
    let user = test_user();
    conn.execute(
        "INSERT INTO inventory (user_prefix, area, field, value, updated_at)
         VALUES (?1, 'armor', 'Armor_001_Head', 'not json', '2023-06-01T00:00:00Z')",
        params![user_prefix(&user)],
    )
    .unwrap();

    let inventory = UserInventory::new(&conn, &user);
    assert!(inventory.get_all().is_err());
}

#[test]
fn users_do_not_see_each_other() {
    let conn = open_memory().unwrap();
    let alice = User {
        id: "discord:1".to_string(),
        name: "alice".to_string(),
        avatar_url: None,
    };
    let bob = User {
        id: "discord:2".to_string(),
        name: "bob".to_string(),
        avatar_url: None,
    };

    UserInventory::new(&conn, &alice)
        .set_many(&patch(vec![(
            "Armor_001_Head",
            Some(ArmorField {
                level: 1,
                dye: DyeColor::Base,
            }),
        )]))
        .unwrap();

    assert!(UserInventory::new(&conn, &bob).get_all().unwrap().is_empty());
}

#[test]
fn prefix_hides_the_raw_identifier() {
    let user = test_user();
    let prefix = user_prefix(&user);
    assert!(!prefix.contains("1234567890"));
    // Deterministic per identity
    assert_eq!(prefix, user_prefix(&test_user()));
}
