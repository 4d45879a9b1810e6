//! Base color derivation.

use crate::field::{ScalarField, VectorField3};
use crate::noise::{fractal_noise, NoiseSpec};
use crate::registry::MaterialPreset;
use crate::rng::DeterministicRng;

const ALBEDO_LAYER: u32 = 102;

/// Base color generator.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbedoGenerator {
    /// Color when the material defines one.
    pub base_color: Option<[f64; 3]>,
    /// Brightness variation amount.
    pub variation: f64,
    /// Seed.
    pub seed: u32,
    /// Whether the variation noise should wrap.
    pub tileable: bool,
}

impl AlbedoGenerator {
    /// Create a generator from a material preset.
    pub fn from_preset(preset: &MaterialPreset, material_seed: u32) -> Self {
        Self {
            base_color: preset.base_color,
            variation: preset.variation,
            seed: DeterministicRng::derive_layer_seed(material_seed, ALBEDO_LAYER),
            tileable: true,
        }
    }

    /// Set whether the variation noise wraps.
    pub fn with_tileable(mut self, tileable: bool) -> Self {
        self.tileable = tileable;
        self
    }

    /// Shade the base color by height and low-frequency noise.
    ///
    /// Materials without a direct color get a neutral grey ramp from height.
    pub fn generate_from_height(&self, height: &ScalarField) -> VectorField3 {
        let noise = fractal_noise(
            &NoiseSpec::new(height.width, height.height, self.seed)
                .with_cells(12)
                .with_octaves(3)
                .with_tileable(self.tileable),
        );

        let mut buffer = VectorField3::new(height.width, height.height, [0.0; 3]);
        for y in 0..height.height {
            for x in 0..height.width {
                let h = height.get(x, y);
                let n = noise.get(x, y);
                let color = self.base_color.unwrap_or_else(|| {
                    let g = 0.3 + 0.35 * h;
                    [g, g, g]
                });
                let shade = (0.78 + 0.3 * h) * (1.0 + self.variation * 0.2 * (n - 0.5) * 2.0);
                buffer.set(x, y, color.map(|c| (c * shade).clamp(0.0, 1.0)));
            }
        }
        buffer
    }
}
