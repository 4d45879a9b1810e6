//! Scalar and vector field buffers.
//!
//! Every pipeline stage takes fields by reference and returns new ones;
//! nothing is mutated across a stage boundary.

use crate::resample::quantize;

/// A single-channel 2D field of `f64` values (row-major).
///
/// Values are conventionally in [0, 1]. Raw noise sums may leave that
/// range until they are renormalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (row-major).
    pub data: Vec<f64>,
}

impl ScalarField {
    /// Create a field filled with a value.
    pub fn new(width: u32, height: u32, fill: f64) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: vec![fill; size],
        }
    }

    /// Build a field by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f64) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.data[self.index(x, y)]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f64) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Get a pixel with toroidal wrapping.
    #[inline]
    pub fn get_wrapped(&self, x: i64, y: i64) -> f64 {
        let wx = x.rem_euclid(self.width as i64) as u32;
        let wy = y.rem_euclid(self.height as i64) as u32;
        self.get(wx, wy)
    }

    /// Apply `f` to every value, returning a new field.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two same-sized fields value by value.
    pub fn zip_map(&self, other: &ScalarField, f: impl Fn(f64, f64) -> f64) -> Self {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        Self {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// Minimum and maximum value.
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Min-max renormalize to [0, 1].
    ///
    /// A constant field has no range to stretch and becomes 0.5 everywhere.
    pub fn renormalized(&self) -> Self {
        let (lo, hi) = self.min_max();
        let range = hi - lo;
        if range.is_nan() || range <= 1e-12 {
            return Self::new(self.width, self.height, 0.5);
        }
        self.map(|v| (v - lo) / range)
    }

    /// Clamp every value to [0, 1].
    pub fn clamped(&self) -> Self {
        self.map(|v| v.clamp(0.0, 1.0))
    }

    /// Arithmetic mean.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Population variance.
    pub fn variance(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        self.data.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / self.data.len() as f64
    }

    /// Value below which the fraction `q` of samples fall.
    pub fn quantile(&self, q: f64) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mut sorted = self.data.clone();
        let k = ((sorted.len() - 1) as f64 * q.clamp(0.0, 1.0)).round() as usize;
        let (_, value, _) = sorted.select_nth_unstable_by(k, |a, b| a.total_cmp(b));
        *value
    }

    /// First pixel whose value is NaN or outside [0, 1], if any.
    pub fn find_out_of_range(&self) -> Option<(u32, u32, f64)> {
        self.data
            .iter()
            .position(|v| !(0.0..=1.0).contains(v))
            .map(|i| {
                let x = (i % self.width as usize) as u32;
                let y = (i / self.width as usize) as u32;
                (x, y, self.data[i])
            })
    }

    /// Quantize to 8-bit bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.iter().map(|&v| quantize(v)).collect()
    }
}

/// A 2D field of 3-component vectors (row-major).
///
/// Normal fields store unit vectors remapped from [-1, 1] to [0, 1] per
/// component; base color stores linear RGB in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField3 {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (row-major).
    pub data: Vec<[f64; 3]>,
}

impl VectorField3 {
    /// Create a field filled with a value.
    pub fn new(width: u32, height: u32, fill: [f64; 3]) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: vec![fill; size],
        }
    }

    /// Build a field by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [f64; 3]) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [f64; 3] {
        self.data[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: [f64; 3]) {
        let idx = (y as usize) * (self.width as usize) + x as usize;
        self.data[idx] = value;
    }

    /// Decode a stored normal back to [-1, 1] components.
    #[inline]
    pub fn decode_normal(&self, x: u32, y: u32) -> [f64; 3] {
        let [r, g, b] = self.get(x, y);
        [r * 2.0 - 1.0, g * 2.0 - 1.0, b * 2.0 - 1.0]
    }

    /// Get a pixel with toroidal wrapping.
    #[inline]
    pub fn get_wrapped(&self, x: i64, y: i64) -> [f64; 3] {
        let wx = x.rem_euclid(self.width as i64) as u32;
        let wy = y.rem_euclid(self.height as i64) as u32;
        self.get(wx, wy)
    }

    /// First component that is NaN or outside [0, 1], if any.
    pub fn find_out_of_range(&self) -> Option<(u32, u32, f64)> {
        self.data.iter().enumerate().find_map(|(i, v)| {
            v.iter().find(|c| !(0.0..=1.0).contains(*c)).map(|&c| {
                let x = (i % self.width as usize) as u32;
                let y = (i / self.width as usize) as u32;
                (x, y, c)
            })
        })
    }

    /// Quantize to interleaved 8-bit RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 3);
        for v in &self.data {
            bytes.extend(v.iter().map(|&c| quantize(c)));
        }
        bytes
    }
}
