//! Main entry point for material generation.
//!
//! [`generate_material`] runs the whole pipeline for one registry entry:
//! height at the working resolution, then normal, parameter and base color
//! fields in parallel, a range check, resampling to the output size and
//! optional ORM packing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::albedo::AlbedoGenerator;
use crate::field::{ScalarField, VectorField3};
use crate::height::{build_height, HeightContext, Quality};
use crate::normal::{NormalConvention, NormalDeriver};
use crate::packing::{pack_channels, MapKind, PackedChannels, PackedImage, PackingError};
use crate::params::{synthesize_parameters, AuxiliaryNoise};
use crate::png::{self, PngConfig, PngError};
use crate::registry::{MaterialEntry, MaterialRegistry};
use crate::resample::{resample_color, resample_normals, resample_scalar};
use crate::rng::DeterministicRng;

/// Largest accepted output or working resolution.
pub const MAX_RESOLUTION: u32 = 16384;

/// Errors from material generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Material '{0}' is not registered")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A field left [0, 1] after its own clamping. Always a logic defect.
    #[error("Map '{map}' has value {value} at ({x}, {y}), outside [0, 1]")]
    OutOfRange {
        map: &'static str,
        value: f64,
        x: u32,
        y: u32,
    },

    #[error("Packing error: {0}")]
    Packing(#[from] PackingError),

    #[error("PNG error: {0}")]
    Png(#[from] PngError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerateError {
    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::NotFound(_) => "PBR_001",
            GenerateError::InvalidConfiguration(_) => "PBR_002",
            GenerateError::OutOfRange { .. } => "PBR_003",
            GenerateError::Packing(_) => "PBR_004",
            GenerateError::Png(_) => "PBR_005",
            GenerateError::Io(_) => "PBR_006",
        }
    }

    /// Whether the error must stop a whole batch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GenerateError::OutOfRange { .. })
    }
}

/// Generation settings shared by every material of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Square output resolution.
    pub resolution: u32,
    /// Detail tier.
    pub quality: Quality,
    /// Normal map green channel handedness.
    pub convention: NormalConvention,
    /// Emit the packed ORM image.
    pub pack_orm: bool,
    /// Base seed.
    pub seed: u32,
    /// Square resolution all shaping runs at.
    pub working_resolution: u32,
    /// Make every noise layer wrap.
    pub tileable: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            resolution: 1024,
            quality: Quality::Medium,
            convention: NormalConvention::Default,
            pack_orm: true,
            seed: 0,
            working_resolution: 1024,
            tileable: true,
        }
    }
}

impl GenerationConfig {
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_working_resolution(mut self, resolution: u32) -> Self {
        self.working_resolution = resolution;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_convention(mut self, convention: NormalConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_pack_orm(mut self, pack_orm: bool) -> Self {
        self.pack_orm = pack_orm;
        self
    }

    /// Reject settings no field computation can start from.
    pub fn validate(&self) -> Result<(), GenerateError> {
        for (name, value) in [
            ("resolution", self.resolution),
            ("working_resolution", self.working_resolution),
        ] {
            if !value.is_power_of_two() {
                return Err(GenerateError::InvalidConfiguration(format!(
                    "{} must be a positive power of two, got {}",
                    name, value
                )));
            }
            if value > MAX_RESOLUTION {
                return Err(GenerateError::InvalidConfiguration(format!(
                    "{} must be at most {}, got {}",
                    name, MAX_RESOLUTION, value
                )));
            }
        }
        Ok(())
    }
}

/// All maps of one material at the output resolution.
#[derive(Debug, Clone)]
pub struct MaterialTextureSet {
    pub name: String,
    pub resolution: u32,
    pub quality: Quality,
    pub convention: NormalConvention,
    /// Base seed of the run.
    pub seed: u32,
    /// Seed derived for this material.
    pub material_seed: u32,
    pub base_color: VectorField3,
    pub normal: VectorField3,
    pub roughness: ScalarField,
    pub metallic: ScalarField,
    pub height: ScalarField,
    pub ao: ScalarField,
    /// AO, roughness and metallic packed into R, G and B.
    pub orm: Option<PackedImage>,
}

/// One encoded map.
#[derive(Debug, Clone)]
pub struct EncodedMap {
    /// File suffix such as `basecolor` or `orm`.
    pub suffix: &'static str,
    /// PNG bytes.
    pub data: Vec<u8>,
    /// BLAKE3 hash of the PNG bytes.
    pub hash: String,
}

impl MaterialTextureSet {
    /// The single-channel map of the given kind.
    pub fn scalar(&self, kind: MapKind) -> &ScalarField {
        match kind {
            MapKind::Height => &self.height,
            MapKind::Roughness => &self.roughness,
            MapKind::Metallic => &self.metallic,
            MapKind::Ao => &self.ao,
        }
    }

    /// Encode every map with the deterministic PNG settings.
    pub fn encode(&self) -> Result<Vec<EncodedMap>, GenerateError> {
        let config = &PngConfig::default();
        let mut maps = Vec::with_capacity(7);
        let mut push = |suffix, (data, hash): (Vec<u8>, String)| {
            maps.push(EncodedMap { suffix, data, hash });
        };

        push("basecolor", png::write_rgb_to_vec_with_hash(&self.base_color, config)?);
        push("normal", png::write_rgb_to_vec_with_hash(&self.normal, config)?);
        for kind in [MapKind::Roughness, MapKind::Metallic, MapKind::Height, MapKind::Ao] {
            push(
                kind.as_str(),
                png::write_grayscale_to_vec_with_hash(self.scalar(kind), config)?,
            );
        }
        if let Some(orm) = &self.orm {
            push("orm", png::write_packed_to_vec_with_hash(orm, config)?);
        }

        Ok(maps)
    }
}

/// Look up a material by name and generate it.
pub fn generate_by_name(
    registry: &MaterialRegistry,
    name: &str,
    config: &GenerationConfig,
) -> Result<MaterialTextureSet, GenerateError> {
    config.validate()?;
    let entry = registry.get(name)?;
    generate_material(entry, config)
}

/// Generate the full texture set of one material.
pub fn generate_material(
    entry: &MaterialEntry,
    config: &GenerationConfig,
) -> Result<MaterialTextureSet, GenerateError> {
    config.validate()?;

    let material_seed = DeterministicRng::derive_material_seed(config.seed, &entry.name);
    let ctx = HeightContext {
        resolution: config.working_resolution,
        seed: material_seed,
        tileable: config.tileable,
    };
    let preset = &entry.preset;

    let height = build_height(entry.constructor.as_ref(), &ctx, config.quality)?;

    let (normal, (params, base_color)) = rayon::join(
        || {
            NormalDeriver::new()
                .with_strength(preset.normal_strength)
                .with_convention(config.convention)
                .derive(&height)
        },
        || {
            rayon::join(
                || {
                    let aux = AuxiliaryNoise::generate(
                        ctx.resolution,
                        material_seed,
                        config.tileable,
                    );
                    synthesize_parameters(&height, &aux, preset)
                },
                || {
                    AlbedoGenerator::from_preset(preset, material_seed)
                        .with_tileable(config.tileable)
                        .generate_from_height(&height)
                },
            )
        },
    );
    log::debug!(
        "{}: fields ready at {}x{}",
        entry.name,
        ctx.resolution,
        ctx.resolution
    );

    check_scalar("height", &height)?;
    check_scalar("roughness", &params.roughness)?;
    check_scalar("metallic", &params.metallic)?;
    check_scalar("ao", &params.ao)?;
    check_vector("basecolor", &base_color)?;
    check_vector("normal", &normal)?;

    let size = config.resolution;
    let height = resample_scalar(&height, size, size);
    let roughness = resample_scalar(&params.roughness, size, size);
    let metallic = resample_scalar(&params.metallic, size, size);
    let ao = resample_scalar(&params.ao, size, size);
    let normal = resample_normals(&normal, size, size);
    let base_color = resample_color(&base_color, size, size);

    let orm = if config.pack_orm {
        let mut maps = HashMap::new();
        maps.insert(MapKind::Ao, &ao);
        maps.insert(MapKind::Roughness, &roughness);
        maps.insert(MapKind::Metallic, &metallic);
        Some(pack_channels(&PackedChannels::orm(), &maps, size, size)?)
    } else {
        None
    };

    Ok(MaterialTextureSet {
        name: entry.name.clone(),
        resolution: size,
        quality: config.quality,
        convention: config.convention,
        seed: config.seed,
        material_seed,
        base_color,
        normal,
        roughness,
        metallic,
        height,
        ao,
        orm,
    })
}

pub(crate) fn check_scalar(map: &'static str, field: &ScalarField) -> Result<(), GenerateError> {
    match field.find_out_of_range() {
        Some((x, y, value)) => Err(GenerateError::OutOfRange { map, value, x, y }),
        None => Ok(()),
    }
}

fn check_vector(map: &'static str, field: &VectorField3) -> Result<(), GenerateError> {
    match field.find_out_of_range() {
        Some((x, y, value)) => Err(GenerateError::OutOfRange { map, value, x, y }),
        None => Ok(()),
    }
}
