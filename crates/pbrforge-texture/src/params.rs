//! Metallic, roughness and ambient occlusion synthesis.
//!
//! Each parameter is the preset base plus a small noise-driven
//! perturbation, clamped to [0, 1]. Metallic moves least and AO most.

use crate::field::ScalarField;
use crate::noise::{fractal_noise, NoiseSpec};
use crate::registry::MaterialPreset;
use crate::rng::DeterministicRng;

/// Gain on the metallic perturbation.
pub const K_METALLIC: f64 = 0.1;
/// Gain on the roughness perturbation.
pub const K_ROUGHNESS: f64 = 0.35;
/// Gain on the AO perturbation.
pub const K_AO: f64 = 0.6;

const AUX_PRIMARY_LAYER: u32 = 100;
const AUX_SECONDARY_LAYER: u32 = 101;
const AUX_CELLS: u32 = 16;

/// Two independent noise fields driving the perturbations.
#[derive(Debug, Clone, PartialEq)]
pub struct AuxiliaryNoise {
    pub primary: ScalarField,
    pub secondary: ScalarField,
}

impl AuxiliaryNoise {
    /// Generate both auxiliary fields for a material.
    pub fn generate(resolution: u32, material_seed: u32, tileable: bool) -> Self {
        let spec = |layer| {
            NoiseSpec::new(
                resolution,
                resolution,
                DeterministicRng::derive_layer_seed(material_seed, layer),
            )
            .with_cells(AUX_CELLS)
            .with_octaves(3)
            .with_tileable(tileable)
        };
        Self {
            primary: fractal_noise(&spec(AUX_PRIMARY_LAYER)),
            secondary: fractal_noise(&spec(AUX_SECONDARY_LAYER)),
        }
    }
}

/// Synthesized parameter maps.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterFields {
    pub metallic: ScalarField,
    pub roughness: ScalarField,
    pub ao: ScalarField,
}

/// Derive metallic, roughness and AO for one material.
///
/// `signal` and `signal2` mix the two auxiliary fields into signed values
/// in [-0.5, 0.5]. With a non-zero `preset.crevice`, AO is further darkened
/// by a blurred inverse of the height field.
pub fn synthesize_parameters(
    height: &ScalarField,
    aux: &AuxiliaryNoise,
    preset: &MaterialPreset,
) -> ParameterFields {
    let variation = preset.variation;
    let signal = aux
        .primary
        .zip_map(&aux.secondary, |a, b| 0.6 * (a - 0.5) + 0.4 * (b - 0.5));
    let signal2 = aux
        .primary
        .zip_map(&aux.secondary, |a, b| 0.3 * (a - 0.5) + 0.7 * (b - 0.5));

    let metallic =
        signal.map(|s| (preset.metallic + s * variation * K_METALLIC).clamp(0.0, 1.0));
    let roughness =
        signal.map(|s| (preset.roughness + s * variation * K_ROUGHNESS).clamp(0.0, 1.0));

    let ao_noise = signal2.map(|s| preset.ao_base + s * variation * K_AO);
    let ao = if preset.crevice > 0.0 {
        let radius = (height.width / 256).max(1);
        let cavities = box_blur_wrapped(&height.map(|h| 1.0 - h), radius);
        let crevice = preset.crevice;
        ao_noise.zip_map(&cavities, |a, c| (a - crevice * c).clamp(0.0, 1.0))
    } else {
        ao_noise.clamped()
    };

    ParameterFields {
        metallic,
        roughness,
        ao,
    }
}

/// Separable box blur with toroidal wrapping.
pub fn box_blur_wrapped(field: &ScalarField, radius: u32) -> ScalarField {
    let r = radius as i64;
    let taps = (2 * r + 1) as f64;

    let horizontal = ScalarField::from_fn(field.width, field.height, |x, y| {
        (-r..=r)
            .map(|d| field.get_wrapped(x as i64 + d, y as i64))
            .sum::<f64>()
            / taps
    });
    ScalarField::from_fn(field.width, field.height, |x, y| {
        (-r..=r)
            .map(|d| horizontal.get_wrapped(x as i64, y as i64 + d))
            .sum::<f64>()
            / taps
    })
}
