//! Import command implementation
//!
//! Remaps one generated material set into engine material-slot naming:
//! `{name}.png`, `{name}_n.png`, `{name}_mra.png` and `{name}_e.png`.
//! The normal map's green channel is flipped only when the requested
//! convention differs from the one recorded in the set's manifest.

use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use pbrforge_texture::batch::{BatchSummary, ItemReport, ItemStatus};
use pbrforge_texture::output::SetManifest;
use pbrforge_texture::packing::{pack_channels, MapKind, PackedChannels};
use pbrforge_texture::png::{write_raw, PngConfig};
use pbrforge_texture::resample::{resample_color, resample_normals, resample_scalar};
use pbrforge_texture::{NormalConvention, ScalarField, VectorField3, MAX_RESOLUTION};

use super::reporting::{exit_code, print_header, print_summary};

/// Options of the import command.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Directory of one generated set (holding `manifest.json`).
    pub src: PathBuf,
    pub dest: PathBuf,
    /// Material slot name.
    pub name: String,
    /// Target square resolution; defaults to the source resolution.
    pub resolution: Option<u32>,
    /// Target normal convention; defaults to the source convention.
    pub convention: Option<NormalConvention>,
    pub dry_run: bool,
}

struct SourceSet {
    dir: PathBuf,
    manifest: SetManifest,
}

impl SourceSet {
    fn path(&self, map: &str) -> PathBuf {
        match self.manifest.file(map) {
            Some(entry) => self.dir.join(&entry.file),
            None => self.dir.join(format!("{}_{}.png", self.manifest.name, map)),
        }
    }
}

/// Import every file of a set, reporting each one separately.
pub fn import_set(options: &ImportOptions) -> Result<BatchSummary> {
    let manifest = SetManifest::load(&options.src)
        .with_context(|| format!("Failed to load set from {}", options.src.display()))?;
    let size = options.resolution.unwrap_or(manifest.resolution);
    if !size.is_power_of_two() {
        anyhow::bail!("resolution must be a positive power of two, got {}", size);
    }
    if size > MAX_RESOLUTION {
        anyhow::bail!("resolution must be at most {}, got {}", MAX_RESOLUTION, size);
    }
    let flip_green = options
        .convention
        .is_some_and(|target| target != manifest.convention);
    log::debug!(
        "importing {} at {}x{} (flip green: {})",
        manifest.name,
        size,
        size,
        flip_green
    );

    if !options.dry_run {
        fs::create_dir_all(&options.dest).with_context(|| {
            format!("Failed to create destination: {}", options.dest.display())
        })?;
    }

    let source = SourceSet {
        dir: options.src.clone(),
        manifest,
    };
    let name = &options.name;
    let emissive = source.path("emissive");
    let mut items = Vec::with_capacity(4);

    items.push(import_item(
        options,
        format!("{}.png", name),
        &[source.path("basecolor")],
        |dest| {
            let color = load_color(&source.path("basecolor"))?;
            write_rgb(&resample_color(&color, size, size), dest)
        },
    ));

    items.push(import_item(
        options,
        format!("{}_n.png", name),
        &[source.path("normal")],
        |dest| {
            let mut normal = resample_normals(&load_color(&source.path("normal"))?, size, size);
            if flip_green {
                for v in &mut normal.data {
                    v[1] = 1.0 - v[1];
                }
            }
            write_rgb(&normal, dest)
        },
    ));

    let mra_sources = [
        source.path("metallic"),
        source.path("roughness"),
        source.path("ao"),
    ];
    items.push(import_item(
        options,
        format!("{}_mra.png", name),
        &mra_sources,
        |dest| {
            let metallic = resample_scalar(&load_scalar(&mra_sources[0])?, size, size);
            let roughness = resample_scalar(&load_scalar(&mra_sources[1])?, size, size);
            let ao = resample_scalar(&load_scalar(&mra_sources[2])?, size, size);

            let mut maps = HashMap::new();
            maps.insert(MapKind::Metallic, &metallic);
            maps.insert(MapKind::Roughness, &roughness);
            maps.insert(MapKind::Ao, &ao);
            let packed = pack_channels(&PackedChannels::mra(), &maps, size, size)?;
            write_raw(
                &packed.data,
                size,
                size,
                png::ColorType::Rgb,
                dest,
                &PngConfig::default(),
            )?;
            Ok(())
        },
    ));

    items.push(import_item(options, format!("{}_e.png", name), &[], |dest| {
        let emissive = if emissive.is_file() {
            resample_color(&load_color(&emissive)?, size, size)
        } else {
            VectorField3::new(size, size, [0.0; 3])
        };
        write_rgb(&emissive, dest)
    }));

    Ok(BatchSummary::new(items))
}

fn import_item(
    options: &ImportOptions,
    file: String,
    sources: &[PathBuf],
    write: impl FnOnce(&Path) -> Result<()>,
) -> ItemReport {
    if let Some(missing) = sources.iter().find(|p| !p.is_file()) {
        log::warn!("{}: missing source {}", file, missing.display());
        return ItemReport::new(file, ItemStatus::Error)
            .with_message(format!("missing source {}", missing.display()));
    }
    if options.dry_run {
        return ItemReport::new(file, ItemStatus::DryRun);
    }

    let dest = options.dest.join(&file);
    match write(&dest) {
        Ok(()) => ItemReport::new(file, ItemStatus::Success).with_files(vec![dest]),
        Err(e) => ItemReport::new(file, ItemStatus::Error).with_message(format!("{:#}", e)),
    }
}

fn load_color(path: &Path) -> Result<VectorField3> {
    let image = image::open(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .to_rgb8();
    let (width, height) = image.dimensions();
    Ok(VectorField3::from_fn(width, height, |x, y| {
        image.get_pixel(x, y).0.map(|c| c as f64 / 255.0)
    }))
}

fn load_scalar(path: &Path) -> Result<ScalarField> {
    let image = image::open(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .to_luma8();
    let (width, height) = image.dimensions();
    Ok(ScalarField::from_fn(width, height, |x, y| {
        image.get_pixel(x, y).0[0] as f64 / 255.0
    }))
}

fn write_rgb(field: &VectorField3, dest: &Path) -> Result<()> {
    write_raw(
        &field.to_rgb8(),
        field.width,
        field.height,
        png::ColorType::Rgb,
        dest,
        &PngConfig::default(),
    )
    .with_context(|| format!("Failed to write {}", dest.display()))
}

/// Run the import command
///
/// # Returns
/// Exit code: 0 success, 2 if any file failed.
pub fn run(options: &ImportOptions, json: bool) -> Result<ExitCode> {
    let start = Instant::now();

    if !json {
        print_header("PBRForge Asset Importer");
        println!("{} {}", "Source:".blue().bold(), options.src.display());
        println!("{} {}", "Destination:".blue().bold(), options.dest.display());
        println!("{} {}", "Name:".blue().bold(), options.name);
        println!();
    }

    let summary = import_set(options)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    } else {
        print_summary("Import Summary", &summary, start.elapsed().as_secs_f64());
    }

    Ok(exit_code(&summary))
}
