//! Tangent-space normal derivation from a height field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::field::{ScalarField, VectorField3};

/// Handedness of the stored green channel.
///
/// This is the single point where the convention is applied. Sets record
/// the convention they were generated with so later conversions can tell
/// whether a flip is still needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalConvention {
    /// Normal built as `(-dx, -dy, 1)`.
    #[default]
    Default,
    /// Y component negated relative to [`NormalConvention::Default`].
    Mirrored,
}

impl NormalConvention {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            NormalConvention::Default => "default",
            NormalConvention::Mirrored => "mirrored",
        }
    }
}

impl fmt::Display for NormalConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(NormalConvention::Default),
            "mirrored" => Ok(NormalConvention::Mirrored),
            other => Err(format!(
                "unknown normal convention '{}' (expected default or mirrored)",
                other
            )),
        }
    }
}

/// Normal map deriver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalDeriver {
    /// Gradient multiplier.
    pub strength: f64,
    /// Green channel handedness.
    pub convention: NormalConvention,
}

impl NormalDeriver {
    /// Create a deriver with unit strength and the default convention.
    pub fn new() -> Self {
        Self {
            strength: 1.0,
            convention: NormalConvention::Default,
        }
    }

    /// Set the strength.
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    /// Set the convention.
    pub fn with_convention(mut self, convention: NormalConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Derive the encoded normal field.
    ///
    /// Central differences wrap around both edges, so a tiling height field
    /// yields a tiling normal field.
    pub fn derive(&self, height: &ScalarField) -> VectorField3 {
        let mut normals = VectorField3::new(height.width, height.height, [0.5, 0.5, 1.0]);
        let y_sign = match self.convention {
            NormalConvention::Default => 1.0,
            NormalConvention::Mirrored => -1.0,
        };

        for y in 0..height.height {
            for x in 0..height.width {
                let (xi, yi) = (x as i64, y as i64);
                let dx = (height.get_wrapped(xi + 1, yi) - height.get_wrapped(xi - 1, yi))
                    * self.strength;
                let dy = (height.get_wrapped(xi, yi + 1) - height.get_wrapped(xi, yi - 1))
                    * self.strength;

                let (nx, ny, nz) = (-dx, -dy, 1.0);
                let len = (nx * nx + ny * ny + nz * nz).sqrt();
                let (nx, ny, nz) = (nx / len, y_sign * ny / len, nz / len);

                normals.set(x, y, [(nx + 1.0) * 0.5, (ny + 1.0) * 0.5, (nz + 1.0) * 0.5]);
            }
        }

        normals
    }
}

impl Default for NormalDeriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_height_gives_flat_normals() {
        let normals = NormalDeriver::new()
            .with_strength(4.0)
            .derive(&ScalarField::new(16, 16, 0.3));
        assert!(normals.data.iter().all(|&n| n == [0.5, 0.5, 1.0]));
    }

    #[test]
    fn rising_slope_tilts_against_gradient() {
        let height = ScalarField::from_fn(32, 32, |x, _| x as f64 / 31.0);
        let normals = NormalDeriver::new().derive(&height);
        let n = normals.get(16, 16);
        assert!(n[0] < 0.5, "x should tilt away from the rise");
        assert!((n[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn mirrored_flips_only_green() {
        let height = ScalarField::from_fn(32, 32, |x, y| ((x * 7 + y * 13) % 32) as f64 / 31.0);
        let default = NormalDeriver::new().with_strength(2.0).derive(&height);
        let mirrored = NormalDeriver::new()
            .with_strength(2.0)
            .with_convention(NormalConvention::Mirrored)
            .derive(&height);

        for (a, b) in default.data.iter().zip(&mirrored.data) {
            assert_eq!(a[0], b[0]);
            assert!((a[1] - (1.0 - b[1])).abs() < 1e-12);
            assert_eq!(a[2], b[2]);
        }
    }

    #[test]
    fn wraparound_matches_interior_formula() {
        let height = ScalarField::from_fn(16, 8, |x, y| ((x * x + 3 * y) % 11) as f64 / 10.0);
        let strength = 3.0;
        let normals = NormalDeriver::new().with_strength(strength).derive(&height);

        // Column 0 uses column 15 as its left neighbour.
        let dx = (height.get(1, 4) - height.get(15, 4)) * strength;
        let dy = (height.get(0, 5) - height.get(0, 3)) * strength;
        let len = (dx * dx + dy * dy + 1.0).sqrt();
        let expected = [(-dx / len + 1.0) * 0.5, (-dy / len + 1.0) * 0.5, (1.0 / len + 1.0) * 0.5];
        let got = normals.get(0, 4);
        for i in 0..3 {
            assert!((got[i] - expected[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn normals_are_unit_length() {
        let height = ScalarField::from_fn(24, 24, |x, y| ((x * 5 + y * 3) % 17) as f64 / 16.0);
        let normals = NormalDeriver::new().with_strength(10.0).derive(&height);
        for y in 0..24 {
            for x in 0..24 {
                let [nx, ny, nz] = normals.decode_normal(x, y);
                assert!(((nx * nx + ny * ny + nz * nz).sqrt() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn convention_parses() {
        assert_eq!("Mirrored".parse::<NormalConvention>(), Ok(NormalConvention::Mirrored));
        assert!("sideways".parse::<NormalConvention>().is_err());
    }
}
