//! Extraction run orchestration: parse, convert, prune, write.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use armory_sheet::Workbook;

use crate::armor::{parse_armors, ArmorRecord};
use crate::error::ExtractError;
use crate::icons::{convert_all, IconJob, IconOutcome, IconStatus};
use crate::materials::{parse_materials, MaterialRecord};

/// Output layout under the static assets root.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    root: PathBuf,
}

impl AssetPaths {
    pub fn new(root: impl Into<PathBuf>) -> AssetPaths {
        AssetPaths { root: root.into() }
    }

    pub fn armors_json(&self) -> PathBuf {
        self.root.join("data").join("armors.json")
    }

    pub fn materials_json(&self) -> PathBuf {
        self.root.join("data").join("materials.json")
    }

    pub fn armor_images(&self) -> PathBuf {
        self.root.join("images").join("armor")
    }

    pub fn material_images(&self) -> PathBuf {
        self.root.join("images").join("materials")
    }

    pub fn images_root(&self) -> PathBuf {
        self.root.join("images")
    }
}

/// Summary of one extraction run.
#[derive(Debug, Default, Clone)]
pub struct ExtractReport {
    pub armors: usize,
    pub materials: usize,
    pub icons_converted: usize,
    pub icons_reused: usize,
    pub icons_failed: usize,
}

/// Build the icon work list for both catalogs.
pub fn plan_icon_jobs(
    armors: &[ArmorRecord],
    materials: &[MaterialRecord],
    assets: &AssetPaths,
    cache_dir: &Path,
) -> Vec<IconJob> {
    let mut jobs = Vec::new();
    for record in armors {
        for icon in &record.icons {
            jobs.push(IconJob {
                dest: assets.armor_images().join(format!("{}.avif", icon.file_stem)),
                cache: cache_dir.join(format!("{}.bin", icon.file_stem)),
                file_stem: icon.file_stem.clone(),
                url: icon.url.clone(),
            });
        }
    }
    for record in materials {
        jobs.push(IconJob {
            dest: assets
                .material_images()
                .join(format!("{}.avif", record.icon.file_stem)),
            cache: cache_dir.join(format!("{}.bin", record.icon.file_stem)),
            file_stem: record.icon.file_stem.clone(),
            url: record.icon.url.clone(),
        });
    }
    jobs
}

/// Remove colors whose icon could not be produced, so the written
/// catalog never points at an image that does not exist.
pub fn prune_failed_colors(records: &mut [ArmorRecord], failed: &HashSet<String>) {
    for record in records {
        let actor = record.armor.actor_name.clone();
        record
            .armor
            .colors
            .retain(|color| !failed.contains(&format!("{actor}_{color}")));
        record
            .armor
            .icon_urls
            .retain(|color, _| !failed.contains(&format!("{actor}_{color}")));
        record
            .icons
            .retain(|icon| !failed.contains(&icon.file_stem));
    }
}

/// Write both catalog JSON files (pretty-printed, stable field order).
pub fn write_catalogs(
    assets: &AssetPaths,
    armors: &[ArmorRecord],
    materials: &[MaterialRecord],
) -> Result<(), ExtractError> {
    if let Some(parent) = assets.armors_json().parent() {
        std::fs::create_dir_all(parent)?;
    }

    let armor_list: Vec<_> = armors.iter().map(|r| &r.armor).collect();
    std::fs::write(
        assets.armors_json(),
        serde_json::to_string_pretty(&armor_list)?,
    )?;

    let material_list: Vec<_> = materials.iter().map(|r| &r.material).collect();
    std::fs::write(
        assets.materials_json(),
        serde_json::to_string_pretty(&material_list)?,
    )?;
    Ok(())
}

/// Run the whole pipeline against an already-loaded workbook.
pub async fn run(
    workbook: &Workbook,
    assets: &AssetPaths,
    cache_dir: &Path,
    concurrency: usize,
    skip_images: bool,
    on_icon: impl FnMut(&IconOutcome),
) -> Result<ExtractReport, ExtractError> {
    let mut armors = parse_armors(workbook)?;
    let materials = parse_materials(workbook)?;

    let mut report = ExtractReport {
        armors: armors.len(),
        materials: materials.len(),
        ..Default::default()
    };

    if !skip_images {
        let jobs = plan_icon_jobs(&armors, &materials, assets, cache_dir);
        let outcomes = convert_all(jobs, concurrency, on_icon).await?;
        let mut failed = HashSet::new();
        for outcome in &outcomes {
            match &outcome.status {
                IconStatus::Converted => report.icons_converted += 1,
                IconStatus::AlreadyDone => report.icons_reused += 1,
                IconStatus::Failed(_) => {
                    report.icons_failed += 1;
                    failed.insert(outcome.file_stem.clone());
                }
            }
        }
        prune_failed_colors(&mut armors, &failed);
    }

    write_catalogs(assets, &armors, &materials)?;
    Ok(report)
}
