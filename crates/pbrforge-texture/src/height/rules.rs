//! Per-archetype height shaping rules.

use std::f64::consts::TAU;

use super::{HeightConstructor, HeightContext};
use crate::field::ScalarField;
use crate::noise::{fractal_noise, lerp, wave_noise};
use crate::rng::DeterministicRng;

/// Rock with sharp ridges: base + detail noise folded around the midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgedRock {
    /// Lattice cells across the base layer.
    pub base_cells: u32,
    /// Lattice cells across the detail layer.
    pub detail_cells: u32,
    /// Weight of the detail layer.
    pub detail_weight: f64,
}

impl Default for RidgedRock {
    fn default() -> Self {
        Self {
            base_cells: 8,
            detail_cells: 32,
            detail_weight: 0.3,
        }
    }
}

impl HeightConstructor for RidgedRock {
    fn archetype(&self) -> &'static str {
        "ridged"
    }

    fn construct(&self, ctx: &HeightContext) -> ScalarField {
        let base = fractal_noise(&ctx.noise(0).with_cells(self.base_cells).with_octaves(4));
        let detail = fractal_noise(&ctx.noise(1).with_cells(self.detail_cells).with_octaves(3));

        let w = self.detail_weight;
        base.zip_map(&detail, |b, d| b * (1.0 - w) + d * w)
            .map(|v| 1.0 - (2.0 * v - 1.0).abs())
            .renormalized()
    }
}

/// Soil with puddle depressions where the base noise is highest.
#[derive(Debug, Clone, PartialEq)]
pub struct WetTerrain {
    /// Lattice cells across the base layer.
    pub base_cells: u32,
    /// Lattice cells across the micro layer.
    pub micro_cells: u32,
    /// Weight of the micro layer.
    pub micro_weight: f64,
    /// Base-noise quantile above which a puddle forms.
    pub puddle_quantile: f64,
    /// Depth subtracted inside puddles.
    pub depression: f64,
}

impl Default for WetTerrain {
    fn default() -> Self {
        Self {
            base_cells: 6,
            micro_cells: 64,
            micro_weight: 0.2,
            puddle_quantile: 0.8,
            depression: 0.3,
        }
    }
}

impl HeightConstructor for WetTerrain {
    fn archetype(&self) -> &'static str {
        "wet"
    }

    fn construct(&self, ctx: &HeightContext) -> ScalarField {
        let base = fractal_noise(&ctx.noise(0).with_cells(self.base_cells).with_octaves(4));
        let micro = fractal_noise(&ctx.noise(1).with_cells(self.micro_cells).with_octaves(2));

        let w = self.micro_weight;
        let combined = base.zip_map(&micro, |b, m| b * (1.0 - w) + m * w);

        let threshold = base.quantile(self.puddle_quantile);
        let depression = self.depression;
        combined
            .zip_map(&base, |c, b| if b > threshold { c - depression } else { c })
            .renormalized()
    }
}

/// Wind-blown dunes with fine ripples. The large-scale shape is analytic.
#[derive(Debug, Clone, PartialEq)]
pub struct Dunes {
    /// Dune crests across the tile.
    pub dunes: u32,
    /// Meander cycles down the tile.
    pub meanders: u32,
    /// Meander displacement in dune periods.
    pub meander_amount: f64,
    /// Weight of the ripple pattern.
    pub ripple_weight: f64,
    /// Sinusoids in the ripple pattern.
    pub ripple_waves: u32,
    /// Ripple frequency range in cycles per tile.
    pub ripple_freq: (u32, u32),
}

impl Default for Dunes {
    fn default() -> Self {
        Self {
            dunes: 4,
            meanders: 2,
            meander_amount: 0.15,
            ripple_weight: 0.2,
            ripple_waves: 24,
            ripple_freq: (24, 48),
        }
    }
}

impl HeightConstructor for Dunes {
    fn archetype(&self) -> &'static str {
        "dunes"
    }

    fn construct(&self, ctx: &HeightContext) -> ScalarField {
        let mut rng = DeterministicRng::new(DeterministicRng::derive_layer_seed(ctx.seed, 0));
        let phase = rng.gen_f64();

        let res = ctx.resolution as f64;
        let dunes = self.dunes as f64;
        let meanders = self.meanders as f64;
        let dune = ScalarField::from_fn(ctx.resolution, ctx.resolution, |x, y| {
            let u = x as f64 / res;
            let v = y as f64 / res;
            let meander = self.meander_amount * (TAU * meanders * v).sin();
            0.5 + 0.5 * (TAU * (dunes * u + phase + meander)).sin()
        });

        let ripple = wave_noise(
            &ctx.noise(1)
                .with_waves(self.ripple_waves)
                .with_freq_range(self.ripple_freq.0, self.ripple_freq.1),
        );

        let w = self.ripple_weight;
        dune.zip_map(&ripple, |d, r| d * (1.0 - w) + r * w)
            .renormalized()
    }
}

/// Soft lumpy growth such as moss, grass or snow cover.
#[derive(Debug, Clone, PartialEq)]
pub struct Organic {
    /// Lattice cells across the base layer.
    pub base_cells: u32,
    /// Lattice cells across the lump layer.
    pub lump_cells: u32,
    /// Blend toward the lump layer.
    pub blend: f64,
}

impl Default for Organic {
    fn default() -> Self {
        Self {
            base_cells: 8,
            lump_cells: 24,
            blend: 0.4,
        }
    }
}

impl HeightConstructor for Organic {
    fn archetype(&self) -> &'static str {
        "organic"
    }

    fn construct(&self, ctx: &HeightContext) -> ScalarField {
        let base = fractal_noise(&ctx.noise(0).with_cells(self.base_cells).with_octaves(4));
        let lumps = fractal_noise(&ctx.noise(1).with_cells(self.lump_cells).with_octaves(3));

        let blend = self.blend;
        base.zip_map(&lumps, |b, l| lerp(b, l, blend)).renormalized()
    }
}
