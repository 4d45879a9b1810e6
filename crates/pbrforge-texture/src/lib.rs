//! PBRForge texture synthesis.
//!
//! This crate procedurally synthesizes tileable PBR terrain material sets:
//! base color, normal, roughness, metallic, height and ambient occlusion,
//! plus an optional packed ORM image. Output is byte-identical for the same
//! material, resolution, quality, convention and seed.
//!
//! # Features
//!
//! - **Noise Engine**: value noise, fractal octaves and sums of sinusoids
//! - **Height Rules**: ridged rock, wet terrain, dunes and organic growth
//! - **Derived Maps**: wrap-around normals, noise-driven parameters
//! - **Resample & Pack**: Lanczos resampling, rounded 8-bit quantization, ORM packing
//! - **Deterministic PNG**: fixed compression settings for byte-identical files
//!
//! # Example
//!
//! ```no_run
//! use pbrforge_texture::batch::{run_batch, BatchRequest, CancelToken};
//! use pbrforge_texture::output::DirectorySink;
//! use pbrforge_texture::{GenerationConfig, MaterialRegistry};
//!
//! let registry = MaterialRegistry::builtin();
//! let request = BatchRequest {
//!     materials: vec!["stone".to_string(), "sand".to_string()],
//!     config: GenerationConfig::default().with_resolution(512).with_seed(200),
//!     dry_run: false,
//! };
//!
//! let sink = DirectorySink::new("output");
//! let summary = run_batch(&registry, &request, &sink, &CancelToken::new()).unwrap();
//! assert!(!summary.has_errors());
//! ```
//!
//! # Determinism
//!
//! - PCG32 is used for every random draw, seeded per call
//! - Layer and material seeds are derived with BLAKE3
//! - Shaping runs at a fixed working resolution, independent of output size
//! - PNG encoding uses fixed compression settings

pub mod albedo;
pub mod batch;
pub mod field;
pub mod generate;
pub mod height;
pub mod noise;
pub mod normal;
pub mod output;
pub mod packing;
pub mod params;
pub mod png;
pub mod registry;
pub mod resample;
pub mod rng;

pub use batch::{run_batch, BatchRequest, BatchSummary, CancelToken, ItemReport, ItemStatus};
pub use field::{ScalarField, VectorField3};
pub use generate::{
    generate_by_name, generate_material, GenerateError, GenerationConfig, MaterialTextureSet,
    MAX_RESOLUTION,
};
pub use height::{HeightConstructor, HeightContext, Quality};
pub use noise::{fractal_noise, value_noise, wave_noise, NoiseSpec};
pub use normal::{NormalConvention, NormalDeriver};
pub use output::{DirectorySink, SetManifest, TextureSink};
pub use packing::{pack_channels, unpack_channel, ChannelSource, MapKind, PackedChannels, PackedImage};
pub use png::{PngConfig, PngError};
pub use registry::{MaterialEntry, MaterialPreset, MaterialRegistry};
pub use rng::DeterministicRng;
