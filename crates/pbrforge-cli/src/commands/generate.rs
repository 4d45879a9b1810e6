//! Generate command implementation
//!
//! Runs the batch driver over the requested materials and writes one
//! directory per material under the output root.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use pbrforge_texture::batch::{run_batch, BatchRequest, CancelToken};
use pbrforge_texture::output::DirectorySink;
use pbrforge_texture::{GenerationConfig, MaterialRegistry, NormalConvention, Quality};

use super::reporting::{exit_code, print_header, print_summary};

/// Arguments of the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    pub materials: Vec<String>,
    pub out_root: PathBuf,
    pub config: Option<PathBuf>,
    pub resolution: Option<u32>,
    pub working_resolution: Option<u32>,
    pub quality: Option<Quality>,
    pub convention: Option<NormalConvention>,
    pub seed: Option<u32>,
    pub no_orm: bool,
    pub dry_run: bool,
    pub json: bool,
}

/// Load the config file if given, then apply flag overrides.
pub fn resolve_config(args: &GenerateArgs) -> Result<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GenerationConfig::default(),
    };

    if let Some(resolution) = args.resolution {
        config.resolution = resolution;
    }
    if let Some(resolution) = args.working_resolution {
        config.working_resolution = resolution;
    }
    if let Some(quality) = args.quality {
        config.quality = quality;
    }
    if let Some(convention) = args.convention {
        config.convention = convention;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.no_orm {
        config.pack_orm = false;
    }

    Ok(config)
}

fn load_config(path: &Path) -> Result<GenerationConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 success, 2 if any material failed. Configuration errors
/// are returned as `Err`.
pub fn run(args: &GenerateArgs) -> Result<ExitCode> {
    let start = Instant::now();
    let config = resolve_config(args)?;
    config.validate()?;

    if !args.json {
        print_header("PBRForge Material Generator");
        println!("{} {}", "Output directory:".blue().bold(), args.out_root.display());
        println!(
            "{} {} (working {})",
            "Resolution:".blue().bold(),
            config.resolution,
            config.working_resolution
        );
        println!("{} {}", "Quality:".blue().bold(), config.quality);
        println!("{} {}", "Convention:".blue().bold(), config.convention);
        println!("{} {}", "Seed:".blue().bold(), config.seed);
        println!();
    }

    if !args.dry_run {
        fs::create_dir_all(&args.out_root).with_context(|| {
            format!("Failed to create output directory: {}", args.out_root.display())
        })?;
    }

    let registry = MaterialRegistry::builtin();
    let request = BatchRequest {
        materials: args.materials.clone(),
        config,
        dry_run: args.dry_run,
    };
    let sink = DirectorySink::new(&args.out_root);
    let summary = run_batch(&registry, &request, &sink, &CancelToken::new())?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    } else {
        print_summary(
            "Generation Summary",
            &summary,
            start.elapsed().as_secs_f64(),
        );
    }

    Ok(exit_code(&summary))
}
