use armory_core::{ArmorField, ArmorFieldValue, DyeColor};

#[test]
fn parses_structured_field() {
    let field = ArmorField::parse(r#"{"level":2,"dye":"Navy"}"#).unwrap();
    assert_eq!(field.level, 2);
    assert_eq!(field.dye, DyeColor::Navy);
}

#[test]
fn parses_legacy_bare_integer() {
    let field = ArmorField::parse("3").unwrap();
    assert_eq!(field.level, 3);
    assert_eq!(field.dye, DyeColor::Base);
}

#[test]
fn rejects_out_of_range_level() {
    assert!(ArmorField::parse("7").is_err());
    assert!(ArmorField::parse(r#"{"level":5,"dye":"Base"}"#).is_err());
}

#[test]
fn rejects_garbage() {
    assert!(ArmorField::parse("not json").is_err());
    assert!(ArmorField::parse(r#"{"level":"two","dye":"Base"}"#).is_err());
}

#[test]
fn writes_only_the_structured_form() {
    let field = ArmorField {
        level: 1,
        dye: DyeColor::LightBlue,
    };
    let json = serde_json::to_string(&field).unwrap();
    assert_eq!(json, r#"{"level":1,"dye":"Light Blue"}"#);

    // and the round trip survives the fallback chain
    assert_eq!(ArmorField::parse(&json).unwrap(), field);
}

#[test]
fn patch_values_accept_both_encodings_and_null() {
    let value: Option<ArmorFieldValue> = serde_json::from_str("null").unwrap();
    assert!(value.is_none());

    let value: Option<ArmorFieldValue> = serde_json::from_str("2").unwrap();
    let field = value.unwrap().into_field();
    assert_eq!(field.level, 2);
    assert_eq!(field.dye, DyeColor::Base);

    let value: Option<ArmorFieldValue> =
        serde_json::from_str(r#"{"level":4,"dye":"Crimson"}"#).unwrap();
    assert_eq!(value.unwrap().into_field().dye, DyeColor::Crimson);
}

#[test]
fn dye_names_round_trip() {
    for color in DyeColor::ALL {
        let parsed: DyeColor = color.name().parse().unwrap();
        assert_eq!(parsed, color);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, format!("\"{}\"", color.name()));
    }
}
