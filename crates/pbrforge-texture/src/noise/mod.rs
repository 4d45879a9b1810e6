//! Noise field generation.
//!
//! Every generator is a pure function of its [`NoiseSpec`]: the RNG is
//! created inside the call from `spec.seed`, so equal `NoiseSpec` values always
//! yield bit-identical fields.

mod fbm;
mod value;
mod waves;

pub use fbm::fractal_noise;
pub use value::value_noise;
pub use waves::wave_noise;

/// Parameters for one noise generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseSpec {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Lattice cell size in pixels (value noise).
    pub scale: f64,
    /// Seed for the call-scoped RNG.
    pub seed: u32,
    /// Octave count for fractal noise.
    pub octaves: u8,
    /// Number of sinusoids for wave noise.
    pub waves: u32,
    /// Inclusive integer frequency range for wave noise, in cycles per tile.
    pub freq_range: (u32, u32),
    /// Weight lower-frequency waves more heavily.
    pub low_freq_bias: bool,
    /// Wrap lattice lookups so the field tiles.
    pub tileable: bool,
}

impl NoiseSpec {
    /// Create a spec with default settings: 8 lattice cells across the
    /// width, 4 octaves, 16 waves over frequencies 8..=32, tileable.
    pub fn new(width: u32, height: u32, seed: u32) -> Self {
        Self {
            width,
            height,
            scale: width as f64 / 8.0,
            seed,
            octaves: 4,
            waves: 16,
            freq_range: (8, 32),
            low_freq_bias: false,
            tileable: true,
        }
    }

    /// Set the lattice cell size in pixels.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the cell size so that `cells` lattice cells span the width.
    ///
    /// Sizing the lattice relative to the field keeps the pattern the same
    /// at every resolution.
    pub fn with_cells(mut self, cells: u32) -> Self {
        self.scale = self.width as f64 / cells.max(1) as f64;
        self
    }

    /// Set the octave count.
    pub fn with_octaves(mut self, octaves: u8) -> Self {
        self.octaves = octaves.max(1);
        self
    }

    /// Set the wave count.
    pub fn with_waves(mut self, waves: u32) -> Self {
        self.waves = waves.max(1);
        self
    }

    /// Set the wave frequency range.
    pub fn with_freq_range(mut self, lo: u32, hi: u32) -> Self {
        let lo = lo.max(1);
        self.freq_range = (lo, hi.max(lo));
        self
    }

    /// Enable or disable low-frequency weighting.
    pub fn with_low_freq_bias(mut self, bias: bool) -> Self {
        self.low_freq_bias = bias;
        self
    }

    /// Enable or disable lattice wrapping.
    pub fn with_tileable(mut self, tileable: bool) -> Self {
        self.tileable = tileable;
        self
    }
}

/// Smooth interpolation (smoothstep).
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}
