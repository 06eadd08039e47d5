//! Workbook acquisition from a published Google Sheet.

use std::time::Duration;

use crate::error::ExtractError;

/// Download the XLSX export of a published sheet. Any failure here is
/// fatal to the run.
pub async fn download_workbook(sheet_id: &str) -> Result<Vec<u8>, ExtractError> {
    let url =
        format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=xlsx");
    log::info!("downloading workbook from {url}");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;
    let bytes = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Ok(bytes.to_vec())
}
