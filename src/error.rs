//! Error types.
//!
//! Every failure is scoped to the single operation that produced it. Nothing
//! here is retried internally; a caller that wants a retry re-invokes the
//! operation.

use thiserror::Error;

use crate::asset::AssetRef;
use crate::catalog::Axis;
use crate::color::WallColor;

/// A wall color string that is not valid hex notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid wall color `{input}` (expected #rrggbb or #rgb)")]
pub struct ColorParseError {
    pub input: String,
}

/// A catalog that fails validation.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An axis has no items.
    #[error("Catalog axis `{axis}` has no items")]
    EmptyAxis { axis: Axis },

    /// The same identifier appears twice on one axis.
    #[error("Catalog axis `{axis}` lists `{id}` more than once")]
    DuplicateItem { axis: Axis, id: String },

    /// An asset entry or the default combination names an unknown identifier.
    #[error("Catalog references unknown {axis} `{id}`")]
    UnknownItem { axis: Axis, id: String },

    /// Two asset entries share the same combination.
    #[error("Catalog maps {combination} to more than one asset")]
    DuplicateAsset { combination: String },

    /// The default combination has no asset, so the fallback chain could dead-end.
    #[error("Default combination {combination} has no asset")]
    MissingDefaultAsset { combination: String },

    /// The default wall color is tinted, so a new session would not start neutral.
    #[error("Default wall color {color} is not neutral (expected #ffffff)")]
    TintedDefaultWallColor { color: WallColor },

    /// The catalog file could not be parsed.
    #[error("Failed to parse catalog")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
}

/// A rejected selection. State is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The identifier is not in the catalog for that axis.
    #[error("`{id}` is not a valid {axis} selection")]
    InvalidSelection { axis: Axis, id: String },
}

/// Resolution failure. Only reachable with a state that bypassed the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Selection state holds unknown {axis} `{id}`")]
    InvalidState { axis: Axis, id: String },
}

/// Failure loading or decoding a base asset.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The reference is absolute or escapes the asset root.
    #[error("Asset reference `{asset}` is not a relative path inside the asset root")]
    InvalidReference { asset: AssetRef },

    /// Nothing is stored under the reference.
    #[error("Asset `{asset}` not found")]
    NotFound { asset: AssetRef },

    /// Reading the asset failed.
    #[error("Failed to read asset `{asset}`")]
    Io {
        asset: AssetRef,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a decodable raster image.
    #[error("Failed to decode asset `{asset}`")]
    Decode {
        asset: AssetRef,
        #[source]
        source: image::ImageError,
    },

    /// The SVG could not be parsed or rasterized.
    #[error("Failed to render SVG asset `{asset}`: {reason}")]
    Svg { asset: AssetRef, reason: String },
}

/// Export failure.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The base asset could not be loaded or decoded.
    #[error("Base asset `{asset}` is unavailable")]
    AssetUnavailable {
        asset: AssetRef,
        #[source]
        source: AssetError,
    },

    /// Compositing or encoding failed.
    #[error("Failed to encode exported design: {reason}")]
    EncodingFailure { reason: String },

    /// The caller cancelled the export before it completed.
    #[error("Export cancelled")]
    Cancelled,

    /// Another export is still in flight.
    #[error("An export is already in progress")]
    Busy,

    /// The selection could not be resolved to a view.
    #[error("Selection could not be resolved")]
    InvalidState(#[from] ResolveError),
}

impl ExportError {
    /// Returns true for [`ExportError::Cancelled`], which callers should not report.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::AssetUnavailable { .. }
            | Self::EncodingFailure { .. }
            | Self::InvalidState(_) => {
                "There was an error downloading your design. Please try again.".to_string()
            }
            Self::Cancelled => "The download was cancelled.".to_string(),
            Self::Busy => "Your design is already being prepared for download.".to_string(),
        }
    }
}
