//! Height-field construction.
//!
//! Each material archetype implements [`HeightConstructor`]. Construction
//! always runs at the working resolution of the [`HeightContext`]; callers
//! resample the finished field to the requested output size.

mod rules;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::field::ScalarField;
use crate::generate::{check_scalar, GenerateError};
use crate::noise::{wave_noise, NoiseSpec};
use crate::rng::DeterministicRng;

pub use rules::{Dunes, Organic, RidgedRock, WetTerrain};

/// Layer index reserved for the high-frequency detail pass.
const DETAIL_LAYER: u32 = 50;

/// Output quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// No detail pass.
    Low,
    /// Light detail pass.
    #[default]
    Medium,
    /// Dense, low-frequency weighted detail pass.
    High,
}

impl Quality {
    /// Parameters of the detail pass for this tier, if it runs at all.
    pub fn detail_pass(self) -> Option<DetailPass> {
        match self {
            Quality::Low => None,
            Quality::Medium => Some(DetailPass {
                waves: 16,
                freq_range: (32, 96),
                low_freq_bias: false,
                amount: 0.04,
            }),
            Quality::High => Some(DetailPass {
                waves: 32,
                freq_range: (48, 160),
                low_freq_bias: true,
                amount: 0.06,
            }),
        }
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            other => Err(format!(
                "unknown quality '{}' (expected low, medium, or high)",
                other
            )),
        }
    }
}

/// High-frequency sinusoid perturbation applied after shaping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailPass {
    /// Number of sinusoids.
    pub waves: u32,
    /// Frequency range in cycles per tile.
    pub freq_range: (u32, u32),
    /// Weight lower frequencies more heavily.
    pub low_freq_bias: bool,
    /// Signed perturbation magnitude.
    pub amount: f64,
}

/// Inputs shared by every height constructor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightContext {
    /// Square working resolution in pixels.
    pub resolution: u32,
    /// Material seed.
    pub seed: u32,
    /// Whether lattice noise should wrap.
    pub tileable: bool,
}

impl HeightContext {
    /// Noise spec for the given layer of this material.
    pub fn noise(&self, layer: u32) -> NoiseSpec {
        NoiseSpec::new(
            self.resolution,
            self.resolution,
            DeterministicRng::derive_layer_seed(self.seed, layer),
        )
        .with_tileable(self.tileable)
    }
}

/// Builds the normalized height field of one material archetype.
pub trait HeightConstructor: Send + Sync + fmt::Debug {
    /// Short archetype name.
    fn archetype(&self) -> &'static str;

    /// Shape the height field. The result is min-max normalized to [0, 1].
    fn construct(&self, ctx: &HeightContext) -> ScalarField;
}

/// Add `amount * (detail - 0.5)` from a fresh sinusoid field, then clamp.
pub fn apply_detail_pass(height: &ScalarField, pass: &DetailPass, seed: u32) -> ScalarField {
    let spec = NoiseSpec::new(height.width, height.height, seed)
        .with_waves(pass.waves)
        .with_freq_range(pass.freq_range.0, pass.freq_range.1)
        .with_low_freq_bias(pass.low_freq_bias);
    let detail = wave_noise(&spec);
    height.zip_map(&detail, |h, d| (h + pass.amount * (d - 0.5)).clamp(0.0, 1.0))
}

/// Construct a material's height field and apply its quality-tier detail.
///
/// The shaped field is range-checked before the detail pass, which clamps.
pub fn build_height(
    constructor: &dyn HeightConstructor,
    ctx: &HeightContext,
    quality: Quality,
) -> Result<ScalarField, GenerateError> {
    let shaped = constructor.construct(ctx);
    log::debug!(
        "shaped {} height at {}x{}",
        constructor.archetype(),
        ctx.resolution,
        ctx.resolution
    );
    check_scalar("height", &shaped)?;

    Ok(match quality.detail_pass() {
        Some(pass) => {
            let seed = DeterministicRng::derive_layer_seed(ctx.seed, DETAIL_LAYER);
            apply_detail_pass(&shaped, &pass, seed)
        }
        None => shaped,
    })
}
