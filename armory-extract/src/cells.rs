//! Cell value coercion.

use armory_sheet::{CellValue, Row};

use crate::error::ExtractError;
use crate::headers::HeaderMap;

/// String value of a cell, `None` when the column or value is absent.
/// Numeric cells render as their display form.
pub fn opt_string(row: &Row, cols: &HeaderMap, slug: &str) -> Option<String> {
    let column = cols.get(slug)?;
    let cell = row.cell(column)?;
    match &cell.value {
        CellValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        CellValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn required_string(row: &Row, cols: &HeaderMap, slug: &str) -> Result<String, ExtractError> {
    opt_string(row, cols, slug).ok_or_else(|| ExtractError::MissingValue {
        row: row.number(),
        column: slug.to_string(),
    })
}

/// Numeric value of a cell. The literal `-` (and an empty cell) means
/// "no value"; anything else must coerce to a non-negative integer.
pub fn opt_u32(row: &Row, cols: &HeaderMap, slug: &str) -> Result<Option<u32>, ExtractError> {
    let Some(column) = cols.get(slug) else {
        return Ok(None);
    };
    let Some(cell) = row.cell(column) else {
        return Ok(None);
    };
    match &cell.value {
        CellValue::Empty => Ok(None),
        CellValue::Number(n) => to_u32(*n)
            .map(Some)
            .map_err(|detail| invalid(row, slug, detail)),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "-" {
                return Ok(None);
            }
            trimmed
                .parse::<u32>()
                .map(Some)
                .map_err(|_| invalid(row, slug, format!("expected a number, got '{trimmed}'")))
        }
        CellValue::Bool(b) => Err(invalid(row, slug, format!("expected a number, got {b}"))),
    }
}

pub fn required_u32(row: &Row, cols: &HeaderMap, slug: &str) -> Result<u32, ExtractError> {
    opt_u32(row, cols, slug)?.ok_or_else(|| ExtractError::MissingValue {
        row: row.number(),
        column: slug.to_string(),
    })
}

fn to_u32(n: f64) -> Result<u32, String> {
    if n < 0.0 || n.fract() != 0.0 || n > u32::MAX as f64 {
        return Err(format!("expected a non-negative integer, got {n}"));
    }
    Ok(n as u32)
}

fn invalid(row: &Row, slug: &str, detail: String) -> ExtractError {
    ExtractError::InvalidValue {
        row: row.number(),
        column: slug.to_string(),
        detail,
    }
}
