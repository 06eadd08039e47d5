//! In-memory workbook writer.
//!
//! Produces just enough of the XLSX container for [`Workbook`] to read it
//! back: sheet index, relationships, and worksheet grids with inline
//! strings. Used by tests across the workspace to build spreadsheet
//! fixtures without binary test data.
//!
//! [`Workbook`]: crate::workbook::Workbook

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::SheetError;

/// A cell to be written.
#[derive(Debug, Clone)]
pub enum CellSpec {
    Empty,
    Text(String),
    Number(f64),
    /// A formula cell with optional cached string result.
    Formula {
        formula: String,
        cached: Option<String>,
    },
}

impl CellSpec {
    pub fn text(s: impl Into<String>) -> CellSpec {
        CellSpec::Text(s.into())
    }

    pub fn number(n: f64) -> CellSpec {
        CellSpec::Number(n)
    }

    pub fn formula(f: impl Into<String>) -> CellSpec {
        CellSpec::Formula {
            formula: f.into(),
            cached: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct SheetData {
    name: String,
    rows: Vec<Vec<CellSpec>>,
}

impl SheetData {
    /// Append a row. Cells are placed at consecutive columns starting at A.
    pub fn row(&mut self, cells: Vec<CellSpec>) -> &mut Self {
        self.rows.push(cells);
        self
    }
}

/// Builder for a multi-sheet workbook.
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetData>,
}

impl XlsxBuilder {
    pub fn new() -> XlsxBuilder {
        XlsxBuilder::default()
    }

    pub fn add_sheet(&mut self, name: impl Into<String>) -> &mut SheetData {
        self.sheets.push(SheetData {
            name: name.into(),
            rows: Vec::new(),
        });
        self.sheets.last_mut().unwrap()
    }

    /// Serialize the workbook into XLSX bytes.
    pub fn finish(&self) -> Result<Vec<u8>, SheetError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(content_types(self.sheets.len()).as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(workbook_xml(&self.sheets).as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(rels_xml(self.sheets.len()).as_bytes())?;

        for (i, sheet) in self.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
            zip.write_all(sheet_xml(sheet).as_bytes())?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

fn content_types(sheet_count: usize) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
"#,
    );
    for i in 0..sheet_count {
        out.push_str(&format!(
            "<Override PartName=\"/xl/worksheets/sheet{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\n",
            i + 1
        ));
    }
    out.push_str("</Types>");
    out
}

fn workbook_xml(sheets: &[SheetData]) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
"#,
    );
    for (i, sheet) in sheets.iter().enumerate() {
        out.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>\n",
            escape(&sheet.name),
            i + 1,
            i + 1
        ));
    }
    out.push_str("</sheets>\n</workbook>");
    out
}

fn rels_xml(sheet_count: usize) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    for i in 0..sheet_count {
        out.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet{}.xml\"/>\n",
            i + 1,
            i + 1
        ));
    }
    out.push_str("</Relationships>");
    out
}

fn sheet_xml(sheet: &SheetData) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
"#,
    );
    for (row_idx, cells) in sheet.rows.iter().enumerate() {
        let row_number = row_idx + 1;
        out.push_str(&format!("<row r=\"{row_number}\">"));
        for (col_idx, cell) in cells.iter().enumerate() {
            let reference = format!("{}{row_number}", column_letters(col_idx));
            match cell {
                CellSpec::Empty => {}
                CellSpec::Text(text) => out.push_str(&format!(
                    "<c r=\"{reference}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                    escape(text)
                )),
                CellSpec::Number(n) => {
                    out.push_str(&format!("<c r=\"{reference}\"><v>{n}</v></c>"))
                }
                CellSpec::Formula { formula, cached } => {
                    out.push_str(&format!(
                        "<c r=\"{reference}\" t=\"str\"><f>{}</f>",
                        escape(formula)
                    ));
                    if let Some(cached) = cached {
                        out.push_str(&format!("<v>{}</v>", escape(cached)));
                    }
                    out.push_str("</c>");
                }
            }
        }
        out.push_str("</row>\n");
    }
    out.push_str("</sheetData>\n</worksheet>");
    out
}

/// 0-based column index → spreadsheet letters (0 = A, 26 = AA).
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::column_letters;

    #[test]
    fn column_names() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
    }
}
