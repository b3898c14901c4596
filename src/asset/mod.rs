//! Base asset references and the sources that load them.
//!
//! The resolution engine only ever produces an [`AssetRef`]. Turning that
//! reference into pixels is the job of an [`AssetSource`], which the export
//! engine calls from a blocking worker thread.

pub mod svg;

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

// ============================================================================
// AssetRef
// ============================================================================

/// Reference to a pre-rendered kitchen asset, usually a relative file path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the reference names an SVG file.
    pub fn is_svg(&self) -> bool {
        Path::new(&self.0)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// AssetSource
// ============================================================================

/// Loads and decodes base assets.
///
/// Implementations are called from a blocking thread, so plain synchronous
/// I/O is fine.
pub trait AssetSource: Send + Sync {
    /// Loads the asset as an RGBA image.
    fn load(&self, asset: &AssetRef) -> Result<RgbaImage, AssetError>;
}

/// Decodes encoded asset bytes, choosing the SVG rasterizer or the raster
/// decoder by the reference's extension.
pub fn decode_asset(asset: &AssetRef, bytes: &[u8]) -> Result<RgbaImage, AssetError> {
    if asset.is_svg() {
        svg::render_svg(bytes).map_err(|reason| AssetError::Svg {
            asset: asset.clone(),
            reason,
        })
    } else {
        image::load_from_memory(bytes)
            .map(|img| img.to_rgba8())
            .map_err(|source| AssetError::Decode {
                asset: asset.clone(),
                source,
            })
    }
}

// ============================================================================
// DirectoryAssets
// ============================================================================

/// Loads assets from files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a reference to a path, refusing anything that could leave the root.
    fn path_for(&self, asset: &AssetRef) -> Result<PathBuf, AssetError> {
        let relative = Path::new(asset.as_str());
        let contained = !asset.as_str().is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));

        if contained {
            Ok(self.root.join(relative))
        } else {
            Err(AssetError::InvalidReference {
                asset: asset.clone(),
            })
        }
    }
}

impl AssetSource for DirectoryAssets {
    fn load(&self, asset: &AssetRef) -> Result<RgbaImage, AssetError> {
        let path = self.path_for(asset)?;
        let bytes = std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AssetError::NotFound {
                    asset: asset.clone(),
                }
            } else {
                AssetError::Io {
                    asset: asset.clone(),
                    source,
                }
            }
        })?;
        tracing::debug!(%asset, path = %path.display(), bytes = bytes.len(), "read asset");
        decode_asset(asset, &bytes)
    }
}

// ============================================================================
// MemoryAssets
// ============================================================================

#[derive(Debug, Clone)]
enum MemoryAsset {
    Encoded(Vec<u8>),
    Decoded(RgbaImage),
}

/// Holds assets in memory, either encoded or already decoded.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    assets: HashMap<AssetRef, MemoryAsset>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores encoded bytes (PNG, JPEG, SVG, ...), decoded on every load.
    pub fn insert_encoded(&mut self, asset: impl Into<AssetRef>, bytes: Vec<u8>) {
        self.assets.insert(asset.into(), MemoryAsset::Encoded(bytes));
    }

    /// Stores an already decoded image.
    pub fn insert_image(&mut self, asset: impl Into<AssetRef>, image: RgbaImage) {
        self.assets.insert(asset.into(), MemoryAsset::Decoded(image));
    }

    pub fn with_image(mut self, asset: impl Into<AssetRef>, image: RgbaImage) -> Self {
        self.insert_image(asset, image);
        self
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetSource for MemoryAssets {
    fn load(&self, asset: &AssetRef) -> Result<RgbaImage, AssetError> {
        match self.assets.get(asset) {
            Some(MemoryAsset::Decoded(image)) => Ok(image.clone()),
            Some(MemoryAsset::Encoded(bytes)) => decode_asset(asset, bytes),
            None => Err(AssetError::NotFound {
                asset: asset.clone(),
            }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
