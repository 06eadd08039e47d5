//! Icon download and conversion.
//!
//! Icon URLs come out of `IMAGE("…")` cell formulas. Each icon is
//! fetched once, its raw bytes cached on disk keyed by file name, and
//! the decoded image re-encoded as AVIF at fixed quality. An existing
//! output file short-circuits both the cache and the network, so
//! re-running the pipeline only converts what changed.

use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use image::codecs::avif::AvifEncoder;

use crate::error::ExtractError;
use crate::worker_pool::WorkerPool;

/// Matches the original pipeline's encoder settings.
const AVIF_QUALITY: u8 = 80;
const AVIF_SPEED: u8 = 6;

/// Default worker count. The icon host is a shared service; keep this
/// small.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// One icon to produce: where it comes from and where it lands.
#[derive(Debug, Clone)]
pub struct IconJob {
    /// Output file name without extension (e.g. `Armor_001_Head_Base`).
    pub file_stem: String,
    pub url: String,
    pub dest: PathBuf,
    pub cache: PathBuf,
}

#[derive(Debug, Clone)]
pub struct IconOutcome {
    pub file_stem: String,
    pub status: IconStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconStatus {
    Converted,
    /// The output file already existed; nothing was fetched.
    AlreadyDone,
    /// Fetch or conversion failed; the icon is omitted from this run.
    Failed(String),
}

/// Extract the URL from an `IMAGE("…")` spreadsheet formula.
pub fn image_formula_url(formula: &str) -> Option<&str> {
    let lower = formula.to_ascii_lowercase();
    let start = lower.find("image(")?;
    let rest = &formula[start + "image(".len()..];
    let open = rest.find('"')?;
    let rest = &rest[open + 1..];
    let close = rest.find('"')?;
    Some(&rest[..close])
}

/// Run every job through a bounded worker pool. Individual failures are
/// logged and reported in the outcome list, never propagated. A broken
/// icon must not abort the run.
pub async fn convert_all(
    jobs: Vec<IconJob>,
    concurrency: usize,
    mut on_done: impl FnMut(&IconOutcome),
) -> Result<Vec<IconOutcome>, ExtractError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let mut pool = WorkerPool::start(concurrency, jobs, move |job: IconJob| {
        let client = client.clone();
        async move {
            let status = match convert_one(&client, &job).await {
                Ok(status) => status,
                Err(e) => {
                    log::warn!("icon {}: {e}", job.file_stem);
                    IconStatus::Failed(e.to_string())
                }
            };
            IconOutcome {
                file_stem: job.file_stem,
                status,
            }
        }
    });

    let mut outcomes = Vec::new();
    while let Some(outcome) = pool.recv().await {
        on_done(&outcome);
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

async fn convert_one(
    client: &reqwest::Client,
    job: &IconJob,
) -> Result<IconStatus, ExtractError> {
    if job.dest.exists() {
        return Ok(IconStatus::AlreadyDone);
    }

    let raw = match std::fs::read(&job.cache) {
        Ok(bytes) => bytes,
        Err(_) => {
            let bytes = client
                .get(&job.url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?
                .to_vec();
            if let Some(parent) = job.cache.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Err(e) = std::fs::write(&job.cache, &bytes) {
                log::debug!("cache write failed for {}: {e}", job.file_stem);
            }
            bytes
        }
    };

    let decoded = image::load_from_memory(&raw)?;
    if let Some(parent) = job.dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(std::fs::File::create(&job.dest)?);
    let encoder = AvifEncoder::new_with_speed_quality(writer, AVIF_SPEED, AVIF_QUALITY);
    decoded.write_with_encoder(encoder)?;
    Ok(IconStatus::Converted)
}
