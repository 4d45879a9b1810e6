//! Output collaborator: writes finished texture sets.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::generate::{GenerateError, MaterialTextureSet};
use crate::height::Quality;
use crate::normal::NormalConvention;

/// File name of the per-material manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Receives complete texture sets.
pub trait TextureSink: Send + Sync {
    /// Persist every map of `set`, returning the written paths.
    fn write_set(&self, set: &MaterialTextureSet) -> Result<Vec<PathBuf>, GenerateError>;
}

/// One file recorded in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub map: String,
    pub file: String,
    pub hash: String,
}

/// Provenance of a written texture set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetManifest {
    pub name: String,
    pub resolution: u32,
    pub quality: Quality,
    pub convention: NormalConvention,
    pub seed: u32,
    pub material_seed: u32,
    pub files: Vec<ManifestEntry>,
}

impl SetManifest {
    /// Read `manifest.json` from a set directory.
    pub fn load(dir: &Path) -> Result<Self, GenerateError> {
        let text = std::fs::read_to_string(dir.join(MANIFEST_FILE))?;
        serde_json::from_str(&text).map_err(|e| {
            GenerateError::InvalidConfiguration(format!(
                "{}: {}",
                dir.join(MANIFEST_FILE).display(),
                e
            ))
        })
    }

    /// Look up the file written for a map suffix.
    pub fn file(&self, map: &str) -> Option<&ManifestEntry> {
        self.files.iter().find(|e| e.map == map)
    }
}

/// Writes each set to `<root>/<name>/<name>_<map>.png` plus a manifest.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Create a sink rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory a material's set lands in.
    pub fn set_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl TextureSink for DirectorySink {
    fn write_set(&self, set: &MaterialTextureSet) -> Result<Vec<PathBuf>, GenerateError> {
        let encoded = set.encode()?;

        let dir = self.set_dir(&set.name);
        std::fs::create_dir_all(&dir)?;

        let mut paths = Vec::with_capacity(encoded.len() + 1);
        let mut files = Vec::with_capacity(encoded.len());
        for map in encoded {
            let file = format!("{}_{}.png", set.name, map.suffix);
            let path = dir.join(&file);
            std::fs::write(&path, &map.data)?;
            log::debug!("wrote {}", path.display());
            files.push(ManifestEntry {
                map: map.suffix.to_string(),
                file,
                hash: map.hash,
            });
            paths.push(path);
        }

        let manifest = SetManifest {
            name: set.name.clone(),
            resolution: set.resolution,
            quality: set.quality,
            convention: set.convention,
            seed: set.seed,
            material_seed: set.material_seed,
            files,
        };
        let manifest_path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(&manifest).map_err(std::io::Error::other)?;
        std::fs::write(&manifest_path, json)?;
        paths.push(manifest_path);

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{generate_by_name, GenerationConfig};
    use crate::registry::MaterialRegistry;

    #[test]
    fn writes_named_files_and_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path());
        let config = GenerationConfig::default()
            .with_resolution(16)
            .with_working_resolution(32)
            .with_seed(3);
        let set = generate_by_name(&MaterialRegistry::builtin(), "ice", &config).unwrap();

        let paths = sink.write_set(&set).unwrap();
        assert_eq!(paths.len(), 8);
        for suffix in ["basecolor", "normal", "roughness", "metallic", "height", "ao", "orm"] {
            assert!(tmp.path().join("ice").join(format!("ice_{}.png", suffix)).is_file());
        }

        let manifest = SetManifest::load(&sink.set_dir("ice")).unwrap();
        assert_eq!(manifest.name, "ice");
        assert_eq!(manifest.resolution, 16);
        assert_eq!(manifest.seed, 3);
        assert_eq!(manifest.material_seed, set.material_seed);
        assert_eq!(manifest.convention, NormalConvention::Default);

        let normal = manifest.file("normal").unwrap();
        let bytes = std::fs::read(tmp.path().join("ice").join(&normal.file)).unwrap();
        assert_eq!(crate::png::hash_png(&bytes), normal.hash);
    }

    #[test]
    fn missing_manifest_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            SetManifest::load(tmp.path()),
            Err(GenerateError::Io(_))
        ));
    }
}
