use thiserror::Error;

/// Errors that can occur while reading a workbook.
#[derive(Debug, Error)]
pub enum SheetError {
    /// I/O error reading the workbook file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The container archive is damaged or not a zip at all
    #[error("Invalid workbook archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing failed in one of the workbook parts
    #[error("Invalid workbook XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed XML attribute
    #[error("Invalid workbook XML attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// A required archive part is absent (e.g. xl/workbook.xml)
    #[error("Workbook part not found: {0}")]
    MissingPart(String),

    /// Structurally valid XML with nonsense content
    #[error("Malformed workbook: {0}")]
    Malformed(String),

    /// A cell reference that is not of the `AB12` form
    #[error("Bad cell reference: {0}")]
    BadCellRef(String),
}

impl SheetError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
