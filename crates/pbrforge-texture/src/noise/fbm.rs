//! Multi-octave (fractal) value noise.

use super::{value_noise, NoiseSpec};
use crate::field::ScalarField;
use crate::rng::DeterministicRng;

/// Amplitude multiplier per octave.
const PERSISTENCE: f64 = 0.5;
/// Frequency multiplier per octave.
const LACUNARITY: f64 = 2.0;

/// Sum `spec.octaves` value-noise layers at doubling frequency and halving
/// amplitude, normalized by total amplitude. Output stays in [0, 1).
///
/// Octave `k` draws its lattice from `derive_layer_seed(spec.seed, k)`.
pub fn fractal_noise(spec: &NoiseSpec) -> ScalarField {
    let mut total = ScalarField::new(spec.width, spec.height, 0.0);
    let mut amplitude = 1.0;
    let mut scale = spec.scale;
    let mut max_value = 0.0;

    for k in 0..spec.octaves.max(1) {
        let octave = NoiseSpec {
            scale: scale.max(1.0),
            seed: DeterministicRng::derive_layer_seed(spec.seed, k as u32),
            ..spec.clone()
        };
        let layer = value_noise(&octave);
        total = total.zip_map(&layer, |t, v| t + v * amplitude);

        max_value += amplitude;
        amplitude *= PERSISTENCE;
        scale /= LACUNARITY;
    }

    total.map(|v| v / max_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractal_deterministic() {
        let spec = NoiseSpec::new(64, 64, 42).with_cells(4);
        assert_eq!(fractal_noise(&spec), fractal_noise(&spec));
    }

    #[test]
    fn test_fractal_range() {
        let field = fractal_noise(&NoiseSpec::new(64, 64, 42).with_cells(4).with_octaves(6));
        assert!(field.data.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_octaves_add_detail() {
        // More octaves means larger pixel-to-pixel steps on average.
        let roughness = |field: &ScalarField| -> f64 {
            let mut sum = 0.0;
            for y in 0..field.height {
                for x in 0..field.width - 1 {
                    sum += (field.get(x + 1, y) - field.get(x, y)).abs();
                }
            }
            sum
        };
        let smooth = fractal_noise(&NoiseSpec::new(128, 128, 7).with_cells(4).with_octaves(1));
        let detailed = fractal_noise(&NoiseSpec::new(128, 128, 7).with_cells(4).with_octaves(5));
        assert!(roughness(&detailed) > roughness(&smooth));
    }
}
