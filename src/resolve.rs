//! Resolution of a selection state into a displayable view.
//!
//! [`resolve`] is a pure function of the catalog and the state. It picks the
//! base asset for the chosen cabinet, backsplash and flooring and derives
//! the wall color overlay. The result is never cached: it is cheap and must
//! always reflect the latest state.

use serde::{Deserialize, Serialize};

use crate::asset::AssetRef;
use crate::catalog::{Axis, Catalog, Combination};
use crate::color::WallColor;
use crate::error::ResolveError;
use crate::selection::SelectionState;

/// Opacity of a non-neutral wall color overlay.
pub const OVERLAY_OPACITY: f32 = 0.25;

// ============================================================================
// Overlay
// ============================================================================

/// How the overlay color combines with the base pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum BlendMode {
    /// The overlay color replaces the base color.
    Normal,
    /// The overlay color multiplies the base color, keeping light and shadow visible.
    Multiply,
}

/// The wall color layer drawn over the base asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Overlay {
    pub color: WallColor,
    /// 0.0 (invisible) to 1.0.
    pub opacity: f32,
    pub blend_mode: BlendMode,
}

impl Overlay {
    /// Derives the overlay for a wall color.
    ///
    /// The neutral default is invisible with a normal blend. Every other
    /// color, black and white-ish included, gets [`OVERLAY_OPACITY`] with a
    /// multiply blend.
    pub fn for_wall_color(color: WallColor) -> Self {
        if color.is_neutral() {
            Self {
                color,
                opacity: 0.0,
                blend_mode: BlendMode::Normal,
            }
        } else {
            Self {
                color,
                opacity: OVERLAY_OPACITY,
                blend_mode: BlendMode::Multiply,
            }
        }
    }

    /// Returns true if the overlay leaves the base untouched.
    pub fn is_invisible(&self) -> bool {
        self.opacity <= 0.0
    }
}

// ============================================================================
// ResolvedView
// ============================================================================

/// What the view layer displays for a selection state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ResolvedView {
    /// The combination the state asked for.
    pub requested: Combination,
    /// The combination whose asset is shown.
    pub matched: Combination,
    /// The base asset for `matched`.
    pub base: AssetRef,
    pub overlay: Overlay,
}

impl ResolvedView {
    /// Returns true if the requested combination had no asset of its own.
    pub fn is_fallback(&self) -> bool {
        self.requested != self.matched
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolves a selection state against a catalog.
///
/// Fails only if the state names an identifier the catalog does not know,
/// which cannot happen for state held by a
/// [`SelectionStore`](crate::SelectionStore).
///
/// # Asset fallback
///
/// Not every combination has its own photo. The first of these that has an
/// asset is shown, and [`ResolvedView::matched`] records which one it was:
///
/// 1. the exact `(cabinet, backsplash, flooring)`;
/// 2. `(cabinet, backsplash, default flooring)`;
/// 3. `(cabinet, default backsplash, default flooring)`;
/// 4. the catalog's default combination.
///
/// The cabinet is kept longest because it covers most of the photo. Step 4
/// always succeeds because catalog validation requires the default
/// combination to have an asset.
pub fn resolve(catalog: &Catalog, state: &SelectionState) -> Result<ResolvedView, ResolveError> {
    for (axis, id) in [
        (Axis::Cabinet, &state.cabinet),
        (Axis::Backsplash, &state.backsplash),
        (Axis::Flooring, &state.flooring),
    ] {
        if !catalog.contains(axis, id) {
            return Err(ResolveError::InvalidState {
                axis,
                id: id.clone(),
            });
        }
    }

    let requested = state.combination();
    let (matched, base) = lookup_asset(catalog, &requested);
    if matched != requested {
        tracing::warn!(%requested, %matched, "no asset for combination, using substitute");
    }

    Ok(ResolvedView {
        requested,
        matched,
        base,
        overlay: Overlay::for_wall_color(state.wall_color),
    })
}

fn lookup_asset(catalog: &Catalog, requested: &Combination) -> (Combination, AssetRef) {
    let defaults = catalog.default_combination();
    let candidates = [
        requested.clone(),
        Combination::new(&requested.cabinet, &requested.backsplash, &defaults.flooring),
        Combination::new(&requested.cabinet, &defaults.backsplash, &defaults.flooring),
    ];

    for candidate in candidates {
        if let Some(asset) = catalog.asset_for(&candidate) {
            return (candidate, asset.clone());
        }
    }

    // A catalog built without validation could still lack this entry; an
    // empty reference then surfaces as AssetUnavailable at export time.
    let asset = catalog
        .asset_for(&defaults)
        .cloned()
        .unwrap_or_else(|| AssetRef::new(""));
    (defaults, asset)
}

// ============================================================================
// Tests
// ============================================================================
