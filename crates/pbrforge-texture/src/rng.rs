//! Deterministic RNG wrapper using PCG32.
//!
//! Every random draw in the pipeline goes through this module. Generators
//! are created per call from an explicit seed, never shared, so output does
//! not depend on thread scheduling.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Wrapper around PCG32 for deterministic random number generation.
#[derive(Clone)]
pub struct DeterministicRng {
    inner: Pcg32,
}

impl DeterministicRng {
    /// Create a new RNG from a 32-bit seed.
    ///
    /// The seed is expanded to 64 bits by duplicating the bits.
    pub fn new(seed: u32) -> Self {
        let seed64 = (seed as u64) | ((seed as u64) << 32);
        Self {
            inner: Pcg32::seed_from_u64(seed64),
        }
    }

    /// Derive a seed for a specific noise layer using BLAKE3.
    pub fn derive_layer_seed(base_seed: u32, layer_index: u32) -> u32 {
        let mut input = Vec::with_capacity(8);
        input.extend_from_slice(&base_seed.to_le_bytes());
        input.extend_from_slice(&layer_index.to_le_bytes());
        hash_prefix_u32(&input)
    }

    /// Derive the per-material seed offset using BLAKE3.
    ///
    /// The hashed input is `base_seed` (little endian), the bytes
    /// `material:` and the UTF-8 material name. The first four bytes of the
    /// digest are read as a little-endian `u32`. Exported texture packs
    /// depend on this value, so the layout must never change.
    pub fn derive_material_seed(base_seed: u32, material: &str) -> u32 {
        let mut input = Vec::with_capacity(13 + material.len());
        input.extend_from_slice(&base_seed.to_le_bytes());
        input.extend_from_slice(b"material:");
        input.extend_from_slice(material.as_bytes());
        hash_prefix_u32(&input)
    }

    /// Generate a random f64 in the range [0.0, 1.0).
    #[inline]
    pub fn gen_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Generate a random value in the given range.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.inner.gen_range(range)
    }
}

fn hash_prefix_u32(input: &[u8]) -> u32 {
    let hash = blake3::hash(input);
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&hash.as_bytes()[..4]);
    u32::from_le_bytes(bytes)
}
