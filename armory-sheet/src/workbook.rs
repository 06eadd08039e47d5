//! XLSX workbook reader.
//!
//! An `.xlsx` file is a zip archive of XML parts. This module reads the
//! handful of parts the extraction pipeline needs: the sheet index
//! (`xl/workbook.xml` plus its relationships), the shared-string table,
//! and the per-worksheet cell grids. Cell formulas are preserved as text
//! because icon URLs live inside `IMAGE("…")` formulas.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use zip::ZipArchive;

use crate::error::SheetError;

/// A cell's computed value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text content, if the value is textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// One populated cell: 0-based column index, value, and the formula text
/// when the cell holds one.
#[derive(Debug, Clone)]
pub struct Cell {
    pub column: usize,
    pub value: CellValue,
    pub formula: Option<String>,
}

/// One populated row. `number` is the 1-based spreadsheet row number.
#[derive(Debug, Clone)]
pub struct Row {
    number: u32,
    cells: Vec<Cell>,
}

impl Row {
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Look up a cell by 0-based column index.
    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells
            .binary_search_by_key(&column, |c| c.column)
            .ok()
            .map(|i| &self.cells[i])
    }

    /// Whether any cell in the row carries a value.
    pub fn has_values(&self) -> bool {
        self.cells.iter().any(|c| !c.value.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    rows: Vec<Row>,
}

impl Worksheet {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Populated rows in ascending row-number order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, number: u32) -> Option<&Row> {
        self.rows
            .binary_search_by_key(&number, Row::number)
            .ok()
            .map(|i| &self.rows[i])
    }
}

/// A fully-loaded workbook.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
}

impl Workbook {
    /// Read a workbook from a file on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Workbook, SheetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Read a workbook from bytes already in memory (e.g. a download).
    pub fn from_bytes(bytes: &[u8]) -> Result<Workbook, SheetError> {
        Self::from_reader(Cursor::new(bytes))
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Workbook, SheetError> {
        let mut archive = ZipArchive::new(reader)?;

        let workbook_xml = read_part(&mut archive, "xl/workbook.xml")?;
        let rels_xml = read_part(&mut archive, "xl/_rels/workbook.xml.rels")?;
        let shared = match read_part_optional(&mut archive, "xl/sharedStrings.xml")? {
            Some(xml) => parse_shared_strings(&xml)?,
            None => Vec::new(),
        };

        let sheet_refs = parse_sheet_index(&workbook_xml)?;
        let targets = parse_relationships(&rels_xml)?;

        let mut sheets = Vec::with_capacity(sheet_refs.len());
        for (name, rel_id) in sheet_refs {
            let target = targets.get(&rel_id).ok_or_else(|| {
                SheetError::malformed(format!("sheet '{name}' references unknown rel {rel_id}"))
            })?;
            let part = read_part(&mut archive, target)?;
            let rows = parse_sheet(&part, &shared)?;
            sheets.push(Worksheet { name, rows });
        }

        Ok(Workbook { sheets })
    }

    pub fn worksheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn worksheets(&self) -> &[Worksheet] {
        &self.sheets
    }
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, SheetError> {
    read_part_optional(archive, name)?.ok_or_else(|| SheetError::MissingPart(name.to_string()))
}

fn read_part_optional<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, SheetError> {
    let mut file = match archive.by_name(name) {
        Ok(f) => f,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(Some(contents))
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, SheetError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Parse `xl/workbook.xml` into (sheet name, relationship id) pairs.
fn parse_sheet_index(xml: &str) -> Result<Vec<(String, String)>, SheetError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut sheets = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) if e.name().as_ref() == b"sheet" => {
                let name = attr_value(e, b"name")?
                    .ok_or_else(|| SheetError::malformed("sheet element without a name"))?;
                let rel_id = attr_value(e, b"r:id")?
                    .ok_or_else(|| SheetError::malformed("sheet element without r:id"))?;
                sheets.push((name, rel_id));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(sheets)
}

/// Parse `xl/_rels/workbook.xml.rels` into rel id → archive part name.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, SheetError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut targets = HashMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.name().as_ref() == b"Relationship" =>
            {
                let (Some(id), Some(target)) =
                    (attr_value(e, b"Id")?, attr_value(e, b"Target")?)
                else {
                    continue;
                };
                // Targets are relative to xl/ unless they start from the root
                let part = match target.strip_prefix('/') {
                    Some(absolute) => absolute.to_string(),
                    None => format!("xl/{target}"),
                };
                targets.insert(id, part);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(targets)
}

/// Parse `xl/sharedStrings.xml`. Rich-text runs inside one `<si>` are
/// concatenated into a single string.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>, SheetError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_t = false;
    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == b"t" => in_t = true,
            Event::End(ref e) if e.name().as_ref() == b"t" => in_t = false,
            Event::Text(ref e) if in_t => current.push_str(&e.unescape()?),
            Event::End(ref e) if e.name().as_ref() == b"si" => {
                strings.push(std::mem::take(&mut current));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(strings)
}

/// Parse one worksheet part into populated rows.
fn parse_sheet(xml: &str, shared: &[String]) -> Result<Vec<Row>, SheetError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut rows: Vec<Row> = Vec::new();

    // State for the cell currently being read
    let mut cell_ref: Option<String> = None;
    let mut cell_type: Option<String> = None;
    let mut raw_value: Option<String> = None;
    let mut formula: Option<String> = None;
    let mut section = Section::None;

    #[derive(Clone, Copy, PartialEq)]
    enum Section {
        None,
        Value,
        Formula,
        InlineText,
    }

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"c" => {
                    cell_ref = attr_value(e, b"r")?;
                    cell_type = attr_value(e, b"t")?;
                    raw_value = None;
                    formula = None;
                }
                b"v" => section = Section::Value,
                b"f" => section = Section::Formula,
                b"t" => section = Section::InlineText,
                _ => {}
            },
            Event::Text(ref e) => {
                let text = e.unescape()?;
                match section {
                    Section::Value | Section::InlineText => {
                        raw_value.get_or_insert_with(String::new).push_str(&text)
                    }
                    Section::Formula => {
                        formula.get_or_insert_with(String::new).push_str(&text)
                    }
                    Section::None => {}
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"v" | b"f" | b"t" => section = Section::None,
                b"c" => {
                    let reference = cell_ref
                        .take()
                        .ok_or_else(|| SheetError::malformed("cell without a reference"))?;
                    let (row_number, column) = parse_cell_ref(&reference)?;
                    let value =
                        decode_value(cell_type.take().as_deref(), raw_value.take(), shared)?;
                    let formula = formula.take();
                    if value.is_empty() && formula.is_none() {
                        continue;
                    }
                    push_cell(&mut rows, row_number, Cell { column, value, formula });
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rows)
}

fn push_cell(rows: &mut Vec<Row>, number: u32, cell: Cell) {
    match rows.last_mut() {
        Some(row) if row.number == number => {
            row.cells.push(cell);
            row.cells.sort_by_key(|c| c.column);
        }
        _ => rows.push(Row {
            number,
            cells: vec![cell],
        }),
    }
}

fn decode_value(
    cell_type: Option<&str>,
    raw: Option<String>,
    shared: &[String],
) -> Result<CellValue, SheetError> {
    let Some(raw) = raw else {
        return Ok(CellValue::Empty);
    };
    match cell_type {
        Some("s") => {
            let index: usize = raw
                .parse()
                .map_err(|_| SheetError::malformed(format!("bad shared-string index {raw}")))?;
            let text = shared.get(index).ok_or_else(|| {
                SheetError::malformed(format!("shared-string index {index} out of range"))
            })?;
            Ok(CellValue::Text(text.clone()))
        }
        Some("str") | Some("inlineStr") => Ok(CellValue::Text(raw)),
        Some("b") => Ok(CellValue::Bool(raw == "1")),
        // Error cells ("e") carry no usable value
        Some("e") => Ok(CellValue::Empty),
        _ => {
            let number: f64 = raw
                .parse()
                .map_err(|_| SheetError::malformed(format!("bad numeric cell value {raw}")))?;
            Ok(CellValue::Number(number))
        }
    }
}

/// Split an `AB12` cell reference into (1-based row, 0-based column).
fn parse_cell_ref(reference: &str) -> Result<(u32, usize), SheetError> {
    let split = reference
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| SheetError::BadCellRef(reference.to_string()))?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return Err(SheetError::BadCellRef(reference.to_string()));
    }

    let mut column: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_uppercase() {
            return Err(SheetError::BadCellRef(reference.to_string()));
        }
        column = column * 26 + (c as usize - 'A' as usize + 1);
    }
    let row: u32 = digits
        .parse()
        .map_err(|_| SheetError::BadCellRef(reference.to_string()))?;
    Ok((row, column - 1))
}
