use thiserror::Error;

/// Errors that abort an extraction run.
///
/// Everything here is fatal to the run except where the pipeline
/// explicitly catches it (per-icon fetch/convert failures are downgraded
/// to log warnings and omitted output).
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Workbook error: {0}")]
    Sheet(#[from] armory_sheet::SheetError),

    #[error("Worksheet not found: {0}")]
    MissingSheet(String),

    #[error("Required column missing from sheet '{sheet}': {column}")]
    MissingColumn { sheet: String, column: String },

    #[error("Row {row}: missing required value for '{column}'")]
    MissingValue { row: u32, column: String },

    #[error("Row {row}: bad value in '{column}': {detail}")]
    InvalidValue {
        row: u32,
        column: String,
        detail: String,
    },

    #[error("Malformed upgrade recipe for {actor} (tier {tier}): {detail}")]
    MalformedRecipe {
        actor: String,
        tier: u8,
        detail: String,
    },

    #[error("Row {row}: icon cell '{column}' has no IMAGE(\"…\") formula")]
    IconFormula { row: u32, column: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image decode/encode error: {0}")]
    Image(#[from] image::ImageError),
}
