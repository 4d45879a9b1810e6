//! Built-in terrain material presets.

use std::sync::Arc;

use super::MaterialPreset;
use crate::height::{Dunes, HeightConstructor, Organic, RidgedRock, WetTerrain};

/// Every built-in material as `(name, preset, constructor)`.
pub fn builtin_materials() -> Vec<(&'static str, MaterialPreset, Arc<dyn HeightConstructor>)> {
    vec![
        (
            "stone",
            MaterialPreset {
                base_color: Some([0.42, 0.40, 0.38]),
                metallic: 0.0,
                roughness: 0.85,
                ao_base: 0.9,
                variation: 0.5,
                normal_strength: 6.0,
                crevice: 0.25,
                description: "Weathered grey stone with ridged fractures",
            },
            Arc::new(RidgedRock::default()),
        ),
        (
            "rock",
            MaterialPreset {
                base_color: None,
                metallic: 0.0,
                roughness: 0.8,
                ao_base: 0.85,
                variation: 0.6,
                normal_strength: 8.0,
                crevice: 0.3,
                description: "Coarse cliff rock, shaded from height only",
            },
            Arc::new(RidgedRock {
                base_cells: 5,
                detail_cells: 24,
                detail_weight: 0.35,
            }),
        ),
        (
            "ice",
            MaterialPreset {
                base_color: Some([0.78, 0.88, 0.95]),
                metallic: 0.0,
                roughness: 0.12,
                ao_base: 0.95,
                variation: 0.3,
                normal_strength: 2.0,
                crevice: 0.05,
                description: "Glassy ice sheet with shallow pressure ridges",
            },
            Arc::new(RidgedRock {
                base_cells: 4,
                detail_cells: 16,
                detail_weight: 0.2,
            }),
        ),
        (
            "dirt",
            MaterialPreset {
                base_color: Some([0.36, 0.27, 0.19]),
                metallic: 0.0,
                roughness: 0.9,
                ao_base: 0.88,
                variation: 0.4,
                normal_strength: 4.0,
                crevice: 0.15,
                description: "Packed damp soil with shallow puddles",
            },
            Arc::new(WetTerrain::default()),
        ),
        (
            "mud",
            MaterialPreset {
                base_color: Some([0.25, 0.19, 0.13]),
                metallic: 0.0,
                roughness: 0.55,
                ao_base: 0.85,
                variation: 0.5,
                normal_strength: 3.0,
                crevice: 0.1,
                description: "Saturated mud with wide standing water",
            },
            Arc::new(WetTerrain {
                puddle_quantile: 0.7,
                depression: 0.4,
                ..WetTerrain::default()
            }),
        ),
        (
            "sand",
            MaterialPreset {
                base_color: Some([0.82, 0.71, 0.52]),
                metallic: 0.0,
                roughness: 0.92,
                ao_base: 0.95,
                variation: 0.3,
                normal_strength: 3.0,
                crevice: 0.0,
                description: "Desert sand with dunes and wind ripples",
            },
            Arc::new(Dunes::default()),
        ),
        (
            "moss",
            MaterialPreset {
                base_color: Some([0.24, 0.36, 0.12]),
                metallic: 0.0,
                roughness: 0.95,
                ao_base: 0.8,
                variation: 0.4,
                normal_strength: 3.5,
                crevice: 0.2,
                description: "Dense cushion moss",
            },
            Arc::new(Organic::default()),
        ),
        (
            "grass",
            MaterialPreset {
                base_color: Some([0.28, 0.45, 0.16]),
                metallic: 0.0,
                roughness: 0.9,
                ao_base: 0.82,
                variation: 0.45,
                normal_strength: 3.0,
                crevice: 0.2,
                description: "Short meadow grass clumps",
            },
            Arc::new(Organic {
                base_cells: 10,
                lump_cells: 40,
                blend: 0.5,
            }),
        ),
        (
            "snow",
            MaterialPreset {
                base_color: Some([0.92, 0.94, 0.97]),
                metallic: 0.0,
                roughness: 0.7,
                ao_base: 0.97,
                variation: 0.25,
                normal_strength: 1.5,
                crevice: 0.05,
                description: "Fresh wind-packed snow",
            },
            Arc::new(Organic {
                base_cells: 6,
                lump_cells: 16,
                blend: 0.3,
            }),
        ),
    ]
}
