//! List command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;

use pbrforge_texture::MaterialRegistry;

/// One row of the material listing.
#[derive(Debug, Clone, Serialize)]
pub struct MaterialRow {
    pub name: String,
    pub archetype: &'static str,
    pub base_color: Option<[f64; 3]>,
    pub metallic: f64,
    pub roughness: f64,
    pub ao: f64,
    pub variation: f64,
    pub description: &'static str,
}

/// Rows for every registered material, in name order.
pub fn rows(registry: &MaterialRegistry) -> Vec<MaterialRow> {
    registry
        .entries()
        .map(|entry| MaterialRow {
            name: entry.name.clone(),
            archetype: entry.constructor.archetype(),
            base_color: entry.preset.base_color,
            metallic: entry.preset.metallic,
            roughness: entry.preset.roughness,
            ao: entry.preset.ao_base,
            variation: entry.preset.variation,
            description: entry.preset.description,
        })
        .collect()
}

/// Run the list command
pub fn run(json: bool) -> Result<ExitCode> {
    let rows = rows(&MaterialRegistry::builtin());

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).context("Failed to serialize materials")?
        );
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Built-in materials:".cyan().bold());
    println!(
        "  {:10} {:8} {:>8} {:>9} {:>5}  {}",
        "name".bold(),
        "rule".bold(),
        "metallic".bold(),
        "roughness".bold(),
        "ao".bold(),
        "description".bold()
    );
    for row in &rows {
        let color = match row.base_color {
            Some(_) => String::new(),
            None => " (height-shaded)".dimmed().to_string(),
        };
        println!(
            "  {:10} {:8} {:>8.2} {:>9.2} {:>5.2}  {}{}",
            row.name.green(),
            row.archetype,
            row.metallic,
            row.roughness,
            row.ao,
            row.description,
            color
        );
    }

    Ok(ExitCode::SUCCESS)
}
