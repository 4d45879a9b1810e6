//! Channel packing of single-channel maps into one RGB image.
//!
//! Packing quantizes each source field exactly the way a single-channel map
//! would be quantized, so unpacking a channel returns the same bytes as the
//! standalone map.
//!
//! # Example
//!
//! ```ignore
//! use pbrforge_texture::packing::{pack_channels, MapKind, PackedChannels};
//! use std::collections::HashMap;
//!
//! let mut maps = HashMap::new();
//! maps.insert(MapKind::Ao, &ao);
//! maps.insert(MapKind::Roughness, &roughness);
//! maps.insert(MapKind::Metallic, &metallic);
//!
//! let orm = pack_channels(&PackedChannels::orm(), &maps, 1024, 1024)?;
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::ScalarField;
use crate::resample::quantize;

/// Single-channel maps that can feed a packed channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapKind {
    Height,
    Roughness,
    Metallic,
    Ao,
}

impl MapKind {
    /// Name used in file suffixes and manifests.
    pub fn as_str(self) -> &'static str {
        match self {
            MapKind::Height => "height",
            MapKind::Roughness => "roughness",
            MapKind::Metallic => "metallic",
            MapKind::Ao => "ao",
        }
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source for one packed channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelSource {
    /// Take the value from a map.
    Map(MapKind),
    /// Fill the channel with a constant in [0, 1].
    Constant(f64),
}

/// Sources for the red, green and blue channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedChannels {
    pub r: ChannelSource,
    pub g: ChannelSource,
    pub b: ChannelSource,
}

impl PackedChannels {
    /// Create a packing layout.
    pub fn new(r: ChannelSource, g: ChannelSource, b: ChannelSource) -> Self {
        Self { r, g, b }
    }

    /// Occlusion, roughness, metallic.
    pub fn orm() -> Self {
        Self::new(
            ChannelSource::Map(MapKind::Ao),
            ChannelSource::Map(MapKind::Roughness),
            ChannelSource::Map(MapKind::Metallic),
        )
    }

    /// Metallic, roughness, occlusion.
    pub fn mra() -> Self {
        Self::new(
            ChannelSource::Map(MapKind::Metallic),
            ChannelSource::Map(MapKind::Roughness),
            ChannelSource::Map(MapKind::Ao),
        )
    }

    fn sources(&self) -> [ChannelSource; 3] {
        [self.r, self.g, self.b]
    }
}

/// Errors from channel packing.
#[derive(Debug, thiserror::Error)]
pub enum PackingError {
    /// A referenced map was not supplied.
    #[error("Referenced map '{0}' not found")]
    MissingMap(MapKind),

    /// A source map does not match the packed image size.
    #[error("Map '{map}' is {actual_width}x{actual_height}, expected {width}x{height}")]
    DimensionMismatch {
        map: MapKind,
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// An 8-bit RGB image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedImage {
    pub width: u32,
    pub height: u32,
    /// Interleaved RGB bytes, row-major.
    pub data: Vec<u8>,
}

impl PackedImage {
    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

/// Pack maps into the channels of one RGB image.
///
/// Every referenced map must be exactly `width`x`height`.
pub fn pack_channels(
    packed: &PackedChannels,
    maps: &HashMap<MapKind, &ScalarField>,
    width: u32,
    height: u32,
) -> Result<PackedImage, PackingError> {
    let mut channels: Vec<Vec<u8>> = Vec::with_capacity(3);
    for source in packed.sources() {
        let bytes = match source {
            ChannelSource::Map(kind) => {
                let field = maps.get(&kind).ok_or(PackingError::MissingMap(kind))?;
                if field.width != width || field.height != height {
                    return Err(PackingError::DimensionMismatch {
                        map: kind,
                        width,
                        height,
                        actual_width: field.width,
                        actual_height: field.height,
                    });
                }
                field.to_bytes()
            }
            ChannelSource::Constant(value) => {
                vec![quantize(value); width as usize * height as usize]
            }
        };
        channels.push(bytes);
    }

    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for i in 0..width as usize * height as usize {
        for channel in &channels {
            data.push(channel[i]);
        }
    }

    Ok(PackedImage {
        width,
        height,
        data,
    })
}

/// Extract one channel (0 = R, 1 = G, 2 = B) from a packed image.
pub fn unpack_channel(image: &PackedImage, channel: usize) -> Vec<u8> {
    image.data.iter().skip(channel).step_by(3).copied().collect()
}
