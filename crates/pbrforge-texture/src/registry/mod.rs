//! Material registry.
//!
//! Maps material names to an immutable [`MaterialPreset`] and the height
//! constructor of their archetype. The registry is built once and passed by
//! reference into every generation call.

mod presets;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::generate::GenerateError;
use crate::height::HeightConstructor;
use crate::params::K_ROUGHNESS;

pub use presets::builtin_materials;

/// Immutable per-material parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialPreset {
    /// Linear RGB base color, or `None` when the material has no direct
    /// color and base color is derived from height.
    pub base_color: Option<[f64; 3]>,
    /// Metallic base value.
    pub metallic: f64,
    /// Roughness base value.
    pub roughness: f64,
    /// Ambient occlusion base value.
    pub ao_base: f64,
    /// Magnitude of noise-driven variation.
    pub variation: f64,
    /// Normal map gradient multiplier.
    pub normal_strength: f64,
    /// Crevice darkening applied to AO (0 disables).
    pub crevice: f64,
    /// Human-readable description.
    pub description: &'static str,
}

impl MaterialPreset {
    /// Window that synthesized roughness is guaranteed to fall into.
    pub fn roughness_bounds(&self) -> (f64, f64) {
        let spread = 0.5 * self.variation * K_ROUGHNESS;
        (
            (self.roughness - spread).clamp(0.0, 1.0),
            (self.roughness + spread).clamp(0.0, 1.0),
        )
    }
}

/// A registered material.
#[derive(Debug, Clone)]
pub struct MaterialEntry {
    /// Registry key.
    pub name: String,
    /// Material parameters.
    pub preset: MaterialPreset,
    /// Height construction rule.
    pub constructor: Arc<dyn HeightConstructor>,
}

/// Name-keyed material table.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    entries: BTreeMap<String, MaterialEntry>,
}

impl MaterialRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in terrain material.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, preset, constructor) in builtin_materials() {
            registry.entries.insert(
                name.to_string(),
                MaterialEntry {
                    name: name.to_string(),
                    preset,
                    constructor,
                },
            );
        }
        registry
    }

    /// Add or replace a material.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        preset: MaterialPreset,
        constructor: impl HeightConstructor + 'static,
    ) {
        let name = name.into();
        self.entries.insert(
            name.clone(),
            MaterialEntry {
                name,
                preset,
                constructor: Arc::new(constructor),
            },
        );
    }

    /// Look up a material by name.
    pub fn get(&self, name: &str) -> Result<&MaterialEntry, GenerateError> {
        self.entries
            .get(name)
            .ok_or_else(|| GenerateError::NotFound(name.to_string()))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Registered entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = &MaterialEntry> {
        self.entries.values()
    }

    /// Number of registered materials.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
