use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Workbook could not be read
    #[error("Workbook error: {0}")]
    Sheet(#[from] armory_sheet::SheetError),

    /// Extraction pipeline failure
    #[error("Extraction error: {0}")]
    Extract(#[from] armory_extract::ExtractError),

    /// Store open/migration failure
    #[error("Store error: {0}")]
    Store(#[from] armory_store::StoreError),

    /// Server startup failure
    #[error("Server error: {0}")]
    Serve(#[from] armory_server::ServeError),

    /// HTTP client construction failure
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
