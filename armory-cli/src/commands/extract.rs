//! `armory extract`: workbook to JSON catalogs and icon assets.

use std::collections::HashSet;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use armory_extract::{
    convert_all, download_workbook, parse_armors, parse_materials, plan_icon_jobs,
    prune_failed_colors, write_catalogs, AssetPaths, IconStatus,
};
use armory_sheet::Workbook;

use crate::error::CliError;

pub(crate) async fn run(
    workbook: Option<PathBuf>,
    sheet_id: Option<String>,
    skip_images: bool,
    concurrency: usize,
    cache_dir: Option<PathBuf>,
    assets_root: PathBuf,
) -> Result<(), CliError> {
    let workbook = load_workbook(workbook, sheet_id).await?;

    println!("parsing spreadsheet");
    let mut armors = parse_armors(&workbook)?;
    let materials = parse_materials(&workbook)?;
    println!(
        "found {} armors, {} materials",
        armors.len().if_supports_color(Stdout, |t| t.bold()),
        materials.len().if_supports_color(Stdout, |t| t.bold()),
    );

    let assets = AssetPaths::new(&assets_root);

    if !skip_images {
        let cache_dir = match cache_dir {
            Some(dir) => dir,
            None => dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("armory")
                .join("icons"),
        };
        let jobs = plan_icon_jobs(&armors, &materials, &assets, &cache_dir);

        let pb = ProgressBar::new(jobs.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} [{bar:40}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=> "),
        );

        let outcomes = convert_all(jobs, concurrency, |outcome| {
            pb.set_message(outcome.file_stem.clone());
            pb.inc(1);
        })
        .await?;
        pb.finish_and_clear();

        let mut converted = 0usize;
        let mut reused = 0usize;
        let mut failed: HashSet<String> = HashSet::new();
        for outcome in &outcomes {
            match &outcome.status {
                IconStatus::Converted => converted += 1,
                IconStatus::AlreadyDone => reused += 1,
                IconStatus::Failed(detail) => {
                    eprintln!(
                        "{} {}: {detail}",
                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                        outcome.file_stem,
                    );
                    failed.insert(outcome.file_stem.clone());
                }
            }
        }
        prune_failed_colors(&mut armors, &failed);

        println!(
            "icons: {converted} converted, {reused} already present, {} failed",
            failed.len(),
        );
    }

    println!("writing catalogs");
    write_catalogs(&assets, &armors, &materials)?;
    println!(
        "{} wrote {} and {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        assets.armors_json().display(),
        assets.materials_json().display(),
    );
    Ok(())
}

async fn load_workbook(
    workbook: Option<PathBuf>,
    sheet_id: Option<String>,
) -> Result<Workbook, CliError> {
    match (workbook, sheet_id) {
        (Some(path), _) => {
            println!("loading workbook from {}", path.display());
            Ok(Workbook::open(&path)?)
        }
        (None, Some(sheet_id)) => {
            println!("downloading workbook");
            let bytes = download_workbook(&sheet_id).await?;
            Ok(Workbook::from_bytes(&bytes)?)
        }
        (None, None) => Err(CliError::config(
            "either --workbook or --sheet-id (ARMORY_SHEET_ID) is required",
        )),
    }
}
