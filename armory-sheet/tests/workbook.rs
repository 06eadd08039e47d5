use armory_sheet::{CellSpec, CellValue, Workbook, XlsxBuilder};

fn two_sheet_workbook() -> Vec<u8> {
    let mut builder = XlsxBuilder::new();
    let armors = builder.add_sheet("Armors");
    armors.row(vec![
        CellSpec::text("ActorName"),
        CellSpec::text("Base Defense"),
        CellSpec::text("Icon"),
    ]);
    armors.row(vec![
        CellSpec::text("Armor_001_Head"),
        CellSpec::number(3.0),
        CellSpec::Formula {
            formula: "IMAGE(\"https://example.com/icon.png\")".to_string(),
            cached: Some("#VALUE!".to_string()),
        },
    ]);
    armors.row(vec![CellSpec::Empty, CellSpec::Empty, CellSpec::Empty]);

    let materials = builder.add_sheet("Materials");
    materials.row(vec![CellSpec::text("ActorName")]);
    builder.finish().unwrap()
}

#[test]
fn reads_sheets_by_name() {
    let bytes = two_sheet_workbook();
    let workbook = Workbook::from_bytes(&bytes).unwrap();

    assert_eq!(workbook.worksheets().len(), 2);
    assert!(workbook.worksheet("Armors").is_some());
    assert!(workbook.worksheet("Materials").is_some());
    assert!(workbook.worksheet("Weapons").is_none());
}

#[test]
fn reads_values_and_formulas() {
    let bytes = two_sheet_workbook();
    let workbook = Workbook::from_bytes(&bytes).unwrap();
    let sheet = workbook.worksheet("Armors").unwrap();

    let header = sheet.row(1).unwrap();
    assert_eq!(header.cell(0).unwrap().value.as_str(), Some("ActorName"));
    assert_eq!(header.cell(1).unwrap().value.as_str(), Some("Base Defense"));

    let row = sheet.row(2).unwrap();
    assert_eq!(
        row.cell(0).unwrap().value.as_str(),
        Some("Armor_001_Head")
    );
    assert_eq!(row.cell(1).unwrap().value.as_number(), Some(3.0));

    let icon = row.cell(2).unwrap();
    assert_eq!(
        icon.formula.as_deref(),
        Some("IMAGE(\"https://example.com/icon.png\")")
    );
}

#[test]
fn empty_rows_are_not_materialized() {
    let bytes = two_sheet_workbook();
    let workbook = Workbook::from_bytes(&bytes).unwrap();
    let sheet = workbook.worksheet("Armors").unwrap();

    // Row 3 contained only empty cells
    assert!(sheet.row(3).is_none());
    assert_eq!(sheet.rows().len(), 2);
}

#[test]
fn open_reads_from_disk() {
    let bytes = two_sheet_workbook();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.xlsx");
    std::fs::write(&path, &bytes).unwrap();

    let workbook = Workbook::open(&path).unwrap();
    assert!(workbook.worksheet("Armors").is_some());
}

#[test]
fn missing_parts_are_reported() {
    let err = Workbook::from_bytes(b"definitely not a zip").unwrap_err();
    assert!(matches!(err, armory_sheet::SheetError::Zip(_)));
}

#[test]
fn escaped_text_round_trips() {
    let mut builder = XlsxBuilder::new();
    builder
        .add_sheet("Sheet1")
        .row(vec![CellSpec::text("Fish & Chips <\"rare\">")]);
    let workbook = Workbook::from_bytes(&builder.finish().unwrap()).unwrap();
    let cell_value = workbook.worksheet("Sheet1").unwrap().row(1).unwrap().cell(0).unwrap();
    assert_eq!(cell_value.value.as_str(), Some("Fish & Chips <\"rare\">"));
}
