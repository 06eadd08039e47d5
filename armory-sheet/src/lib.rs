//! Minimal XLSX reader for published-spreadsheet exports.
//!
//! Only what the extraction pipeline needs: worksheet lookup by name,
//! cell values, and formula text. Not a general spreadsheet library.

pub mod builder;
pub mod error;
pub mod workbook;

pub use builder::{CellSpec, XlsxBuilder};
pub use error::SheetError;
pub use workbook::{Cell, CellValue, Row, Workbook, Worksheet};
