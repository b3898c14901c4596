//! The read-only catalog of selectable values.
//!
//! A [`Catalog`] supplies the finite identifier sets for the cabinet,
//! backsplash and flooring axes, the wall color palette, and the table that
//! maps each `(cabinet, backsplash, flooring)` combination to a pre-rendered
//! asset. Catalogs are validated once when they are built and never change
//! afterwards.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "cabinets": [{ "id": "natural-wood", "name": "Natural Wood", "badge": "Premium" }],
//!   "backsplashes": [{ "id": "subway", "name": "Subway" }],
//!   "floorings": [{ "id": "light-oak", "name": "Light Oak" }],
//!   "palette": [{ "name": "Pure White", "color": "#ffffff" }],
//!   "assets": [
//!     {
//!       "cabinet": "natural-wood",
//!       "backsplash": "subway",
//!       "flooring": "light-oak",
//!       "asset": "kitchens/natural-wood_subway_light-oak.jpg"
//!     }
//!   ],
//!   "defaults": {
//!     "wallColor": "#ffffff",
//!     "cabinet": "natural-wood",
//!     "backsplash": "subway",
//!     "flooring": "light-oak"
//!   }
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::asset::AssetRef;
use crate::color::WallColor;
use crate::error::CatalogError;
use crate::selection::SelectionState;
use crate::snapshot::DesignSnapshot;

// ============================================================================
// Axis
// ============================================================================

/// One independently selectable customization dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Axis {
    WallColor,
    Cabinet,
    Backsplash,
    Flooring,
}

impl Axis {
    /// All axes in picker order.
    pub const ALL: [Axis; 4] = [
        Axis::WallColor,
        Axis::Cabinet,
        Axis::Backsplash,
        Axis::Flooring,
    ];

    /// The category identifier used by the picker.
    pub fn category_id(&self) -> &'static str {
        match self {
            Axis::WallColor => "wall-colors",
            Axis::Cabinet => "cabinets",
            Axis::Backsplash => "backsplash",
            Axis::Flooring => "flooring",
        }
    }

    /// Looks an axis up by its category identifier.
    pub fn from_category_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|axis| axis.category_id() == id)
    }

    /// Heading shown for the category.
    pub fn title(&self) -> &'static str {
        match self {
            Axis::WallColor => "Wall Colors",
            Axis::Cabinet => "Cabinet Styles",
            Axis::Backsplash => "Backsplash",
            Axis::Flooring => "Flooring",
        }
    }

    /// One-line description shown under the heading.
    pub fn description(&self) -> &'static str {
        match self {
            Axis::WallColor => "Choose your perfect wall color",
            Axis::Cabinet => "Select cabinet finishes",
            Axis::Backsplash => "Pick backsplash patterns",
            Axis::Flooring => "Choose flooring materials",
        }
    }

    /// Noun appended to an item name in summaries ("Natural Wood Cabinets").
    pub(crate) fn item_noun(&self) -> &'static str {
        match self {
            Axis::WallColor => "Wall Color",
            Axis::Cabinet => "Cabinets",
            Axis::Backsplash => "Backsplash",
            Axis::Flooring => "Flooring",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::WallColor => "wall color",
            Axis::Cabinet => "cabinet",
            Axis::Backsplash => "backsplash",
            Axis::Flooring => "flooring",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Catalog entries
// ============================================================================

/// A selectable cabinet style, backsplash pattern or flooring material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CatalogItem {
    /// Stable identifier stored in the selection state.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Short tag such as "Premium" or "Classic".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,

    /// Representative color for the picker swatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch: Option<WallColor>,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            badge: None,
            swatch: None,
        }
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn with_swatch(mut self, swatch: WallColor) -> Self {
        self.swatch = Some(swatch);
        self
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.id.to_lowercase().contains(needle)
    }
}

/// A named wall color offered by the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct PaletteEntry {
    pub name: String,
    pub color: WallColor,
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, color: WallColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// A `(cabinet, backsplash, flooring)` identifier triple.
///
/// This is the lookup key into the catalog's asset table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Combination {
    pub cabinet: String,
    pub backsplash: String,
    pub flooring: String,
}

impl Combination {
    pub fn new(
        cabinet: impl Into<String>,
        backsplash: impl Into<String>,
        flooring: impl Into<String>,
    ) -> Self {
        Self {
            cabinet: cabinet.into(),
            backsplash: backsplash.into(),
            flooring: flooring.into(),
        }
    }

    /// Returns the identifier this combination holds for a catalog axis.
    ///
    /// Returns `None` for [`Axis::WallColor`].
    pub fn get(&self, axis: Axis) -> Option<&str> {
        match axis {
            Axis::WallColor => None,
            Axis::Cabinet => Some(&self.cabinet),
            Axis::Backsplash => Some(&self.backsplash),
            Axis::Flooring => Some(&self.flooring),
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.cabinet, self.backsplash, self.flooring)
    }
}

/// One row of the asset table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct AssetEntry {
    #[serde(flatten)]
    pub combination: Combination,
    pub asset: AssetRef,
}

// ============================================================================
// Catalog
// ============================================================================

/// Serialized catalog layout. Converted into a [`Catalog`] after validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CatalogFile {
    pub cabinets: Vec<CatalogItem>,
    pub backsplashes: Vec<CatalogItem>,
    pub floorings: Vec<CatalogItem>,
    #[serde(default)]
    pub palette: Vec<PaletteEntry>,
    pub assets: Vec<AssetEntry>,
    pub defaults: DesignSnapshot,
}

/// The validated, read-only catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    file: CatalogFile,
    asset_index: HashMap<Combination, AssetRef>,
}

impl Catalog {
    /// Validates a catalog file and builds the lookup index.
    pub fn new(file: CatalogFile) -> Result<Self, CatalogError> {
        validate(&file)?;
        Ok(Self::index(file))
    }

    /// Parses and validates a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|source| CatalogError::Parse { source })?;
        Self::new(file)
    }

    /// Serializes the catalog to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.file)
    }

    fn index(file: CatalogFile) -> Self {
        let asset_index = file
            .assets
            .iter()
            .map(|entry| (entry.combination.clone(), entry.asset.clone()))
            .collect();
        Self { file, asset_index }
    }

    /// Returns the items for a catalog axis.
    ///
    /// [`Axis::WallColor`] has no items; use [`palette`](Self::palette) instead.
    pub fn items(&self, axis: Axis) -> &[CatalogItem] {
        match axis {
            Axis::WallColor => &[],
            Axis::Cabinet => &self.file.cabinets,
            Axis::Backsplash => &self.file.backsplashes,
            Axis::Flooring => &self.file.floorings,
        }
    }

    /// Looks up an item by identifier.
    pub fn item(&self, axis: Axis, id: &str) -> Option<&CatalogItem> {
        self.items(axis).iter().find(|item| item.id == id)
    }

    /// Returns true if `id` is a valid selection on `axis`.
    pub fn contains(&self, axis: Axis, id: &str) -> bool {
        self.item(axis, id).is_some()
    }

    /// Returns the wall color palette.
    pub fn palette(&self) -> &[PaletteEntry] {
        &self.file.palette
    }

    /// Returns the palette entry with exactly this color, if any.
    pub fn palette_entry(&self, color: WallColor) -> Option<&PaletteEntry> {
        self.file.palette.iter().find(|entry| entry.color == color)
    }

    /// Returns the asset registered for exactly this combination.
    pub fn asset_for(&self, combination: &Combination) -> Option<&AssetRef> {
        self.asset_index.get(combination)
    }

    /// Returns the full asset table.
    pub fn assets(&self) -> &[AssetEntry] {
        &self.file.assets
    }

    /// Returns the default combination. It always has an asset.
    pub fn default_combination(&self) -> Combination {
        let defaults = &self.file.defaults;
        Combination::new(&defaults.cabinet, &defaults.backsplash, &defaults.flooring)
    }

    /// Returns the default wall color.
    pub fn default_wall_color(&self) -> WallColor {
        self.file.defaults.wall_color
    }

    /// Returns the initial selection state for a new session.
    pub fn default_state(&self) -> SelectionState {
        SelectionState::from(self.file.defaults.clone())
    }

    /// Filters an axis's items by a case-insensitive substring of name or id.
    ///
    /// A blank term returns every item.
    pub fn search(&self, axis: Axis, term: &str) -> Vec<&CatalogItem> {
        let needle = term.trim().to_lowercase();
        self.items(axis)
            .iter()
            .filter(|item| needle.is_empty() || item.matches(&needle))
            .collect()
    }

    /// Filters the palette by a case-insensitive substring of name or hex value.
    pub fn search_palette(&self, term: &str) -> Vec<&PaletteEntry> {
        let needle = term.trim().to_lowercase();
        self.file
            .palette
            .iter()
            .filter(|entry| {
                needle.is_empty()
                    || entry.name.to_lowercase().contains(&needle)
                    || entry.color.to_string().contains(&needle)
            })
            .collect()
    }

    /// The catalog shipped with the crate.
    ///
    /// Defaults to natural wood cabinets, a subway backsplash and light oak
    /// flooring under a white wall. Not every combination has a photo; see
    /// [`resolve`](crate::resolve) for how gaps are filled.
    pub fn builtin() -> Self {
        let cabinets = vec![
            item("natural-wood", "Natural Wood", "Premium", WallColor::new(0xfd, 0xe6, 0x8a)),
            item("white-shaker", "White Shaker", "Classic", WallColor::new(0xf8, 0xfa, 0xfc)),
            item("navy-blue", "Navy Blue", "Modern", WallColor::new(0x1e, 0x3a, 0x5c)),
            item("sage-green", "Sage Green", "Trending", WallColor::new(0x9c, 0xaf, 0x88)),
            item("charcoal-gray", "Charcoal Gray", "Modern", WallColor::new(0x37, 0x41, 0x51)),
        ];
        let backsplashes = vec![
            item("subway", "Subway", "Classic", WallColor::new(0xff, 0xff, 0xff)),
            item("herringbone", "Herringbone", "Elegant", WallColor::new(0xe5, 0xe7, 0xeb)),
            item("hexagon", "Hexagon", "Modern", WallColor::new(0xd1, 0xd5, 0xdb)),
            item("marble", "Marble", "Luxury", WallColor::new(0xf3, 0xf4, 0xf6)),
        ];
        let floorings = vec![
            item("light-oak", "Light Oak", "Natural", WallColor::new(0xfe, 0xf3, 0xc7)),
            item("dark-walnut", "Dark Walnut", "Rich", WallColor::new(0x5c, 0x40, 0x33)),
            item("gray-tile", "Gray Tile", "Modern", WallColor::new(0x9c, 0xa3, 0xaf)),
            item("white-marble", "White Marble", "Luxury", WallColor::new(0xf9, 0xfa, 0xfb)),
        ];
        let palette = vec![
            PaletteEntry::new("Pure White", WallColor::NEUTRAL),
            PaletteEntry::new("Navy Depths", WallColor::new(0x1e, 0x3a, 0x5c)),
            PaletteEntry::new("Sage Mist", WallColor::new(0xb2, 0xc2, 0xa8)),
            PaletteEntry::new("Warm Greige", WallColor::new(0xd6, 0xcf, 0xc4)),
            PaletteEntry::new("Terracotta", WallColor::new(0xc6, 0x7b, 0x5c)),
            PaletteEntry::new("Charcoal", WallColor::new(0x36, 0x45, 0x4f)),
            PaletteEntry::new("Butter Yellow", WallColor::new(0xf6, 0xe7, 0xa1)),
            PaletteEntry::new("Blush", WallColor::new(0xe8, 0xc4, 0xc4)),
        ];

        // Every cabinet except charcoal-gray has a photo with the default
        // backsplash and flooring; a handful of other pairings are covered.
        let assets = [
            ("natural-wood", "subway", "light-oak"),
            ("natural-wood", "herringbone", "light-oak"),
            ("natural-wood", "hexagon", "light-oak"),
            ("natural-wood", "marble", "light-oak"),
            ("natural-wood", "subway", "dark-walnut"),
            ("white-shaker", "subway", "light-oak"),
            ("white-shaker", "marble", "white-marble"),
            ("navy-blue", "subway", "light-oak"),
            ("navy-blue", "herringbone", "light-oak"),
            ("sage-green", "subway", "light-oak"),
        ]
        .into_iter()
        .map(|(cabinet, backsplash, flooring)| AssetEntry {
            combination: Combination::new(cabinet, backsplash, flooring),
            asset: AssetRef::new(format!("kitchens/{cabinet}_{backsplash}_{flooring}.jpg")),
        })
        .collect();

        Self::index(CatalogFile {
            cabinets,
            backsplashes,
            floorings,
            palette,
            assets,
            defaults: DesignSnapshot {
                wall_color: WallColor::NEUTRAL,
                cabinet: "natural-wood".to_string(),
                backsplash: "subway".to_string(),
                flooring: "light-oak".to_string(),
            },
        })
    }
}

fn item(id: &str, name: &str, badge: &str, swatch: WallColor) -> CatalogItem {
    CatalogItem::new(id, name).with_badge(badge).with_swatch(swatch)
}

// ============================================================================
// Validation
// ============================================================================

fn validate(file: &CatalogFile) -> Result<(), CatalogError> {
    let axes = [
        (Axis::Cabinet, &file.cabinets),
        (Axis::Backsplash, &file.backsplashes),
        (Axis::Flooring, &file.floorings),
    ];

    for (axis, items) in axes {
        if items.is_empty() {
            return Err(CatalogError::EmptyAxis { axis });
        }
        let mut seen = HashSet::new();
        for item in items.iter() {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateItem {
                    axis,
                    id: item.id.clone(),
                });
            }
        }
    }

    let known = |axis: Axis, id: &str| -> Result<(), CatalogError> {
        let items = match axis {
            Axis::Cabinet => &file.cabinets,
            Axis::Backsplash => &file.backsplashes,
            _ => &file.floorings,
        };
        if items.iter().any(|item| item.id == id) {
            Ok(())
        } else {
            Err(CatalogError::UnknownItem {
                axis,
                id: id.to_string(),
            })
        }
    };

    let check_combination = |combination: &Combination| -> Result<(), CatalogError> {
        known(Axis::Cabinet, &combination.cabinet)?;
        known(Axis::Backsplash, &combination.backsplash)?;
        known(Axis::Flooring, &combination.flooring)
    };

    let mut mapped = HashSet::new();
    for entry in &file.assets {
        check_combination(&entry.combination)?;
        if !mapped.insert(&entry.combination) {
            return Err(CatalogError::DuplicateAsset {
                combination: entry.combination.to_string(),
            });
        }
    }

    let defaults = Combination::new(
        &file.defaults.cabinet,
        &file.defaults.backsplash,
        &file.defaults.flooring,
    );
    check_combination(&defaults)?;
    if !mapped.contains(&defaults) {
        return Err(CatalogError::MissingDefaultAsset {
            combination: defaults.to_string(),
        });
    }

    if !file.defaults.wall_color.is_neutral() {
        return Err(CatalogError::TintedDefaultWallColor {
            color: file.defaults.wall_color,
        });
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn small_file() -> CatalogFile {
        CatalogFile {
            cabinets: vec![CatalogItem::new("oak", "Oak"), CatalogItem::new("ash", "Ash")],
            backsplashes: vec![CatalogItem::new("tile", "Tile")],
            floorings: vec![CatalogItem::new("stone", "Stone")],
            palette: vec![],
            assets: vec![AssetEntry {
                combination: Combination::new("oak", "tile", "stone"),
                asset: AssetRef::new("oak.png"),
            }],
            defaults: DesignSnapshot {
                wall_color: WallColor::NEUTRAL,
                cabinet: "oak".into(),
                backsplash: "tile".into(),
                flooring: "stone".into(),
            },
        }
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert!(validate(&catalog.file).is_ok());
        assert_eq!(
            catalog.default_combination(),
            Combination::new("natural-wood", "subway", "light-oak")
        );
        assert!(catalog.default_wall_color().is_neutral());
    }

    #[test]
    fn builtin_catalog_json_roundtrip() {
        let catalog = Catalog::builtin();
        let json = catalog.to_json().unwrap();
        assert!(json.contains("\"backsplashes\""));
        assert!(json.contains("\"wallColor\": \"#ffffff\""));

        let restored = Catalog::from_json(&json).unwrap();
        assert_eq!(restored.items(Axis::Cabinet), catalog.items(Axis::Cabinet));
        assert_eq!(restored.assets().len(), catalog.assets().len());
    }

    #[test]
    fn membership_lookup() {
        let catalog = Catalog::builtin();
        assert!(catalog.contains(Axis::Cabinet, "natural-wood"));
        assert!(!catalog.contains(Axis::Cabinet, "subway"));
        assert!(catalog.contains(Axis::Backsplash, "subway"));
        assert!(!catalog.contains(Axis::WallColor, "natural-wood"));
        assert_eq!(
            catalog.item(Axis::Flooring, "light-oak").unwrap().badge.as_deref(),
            Some("Natural")
        );
    }

    #[test]
    fn rejects_empty_axis() {
        let mut file = small_file();
        file.floorings.clear();
        assert!(matches!(
            Catalog::new(file),
            Err(CatalogError::EmptyAxis {
                axis: Axis::Flooring
            })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut file = small_file();
        file.cabinets.push(CatalogItem::new("oak", "Oak Again"));
        assert!(matches!(
            Catalog::new(file),
            Err(CatalogError::DuplicateItem { axis: Axis::Cabinet, ref id }) if id == "oak"
        ));
    }

    #[test]
    fn rejects_asset_for_unknown_item() {
        let mut file = small_file();
        file.assets.push(AssetEntry {
            combination: Combination::new("oak", "glass", "stone"),
            asset: AssetRef::new("glass.png"),
        });
        assert!(matches!(
            Catalog::new(file),
            Err(CatalogError::UnknownItem { axis: Axis::Backsplash, ref id }) if id == "glass"
        ));
    }

    #[test]
    fn rejects_duplicate_asset_rows() {
        let mut file = small_file();
        file.assets.push(AssetEntry {
            combination: Combination::new("oak", "tile", "stone"),
            asset: AssetRef::new("other.png"),
        });
        assert!(matches!(
            Catalog::new(file),
            Err(CatalogError::DuplicateAsset { .. })
        ));
    }

    #[test]
    fn rejects_default_without_asset() {
        let mut file = small_file();
        file.defaults.cabinet = "ash".into();
        assert!(matches!(
            Catalog::new(file),
            Err(CatalogError::MissingDefaultAsset { .. })
        ));
    }

    #[test]
    fn rejects_tinted_default_wall_color() {
        let json = Catalog::builtin()
            .to_json()
            .unwrap()
            .replace("\"wallColor\": \"#ffffff\"", "\"wallColor\": \"#eeeeee\"");
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::TintedDefaultWallColor { color })
                if color == WallColor::new(0xee, 0xee, 0xee)
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Catalog::from_json("{ \"cabinets\": 3 }"),
            Err(CatalogError::Parse { .. })
        ));
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = Catalog::builtin();

        let hits: Vec<_> = catalog
            .search(Axis::Cabinet, "  NAVY ")
            .into_iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(hits, vec!["navy-blue"]);

        assert_eq!(
            catalog.search(Axis::Flooring, "").len(),
            catalog.items(Axis::Flooring).len()
        );
        assert!(catalog.search(Axis::Backsplash, "carpet").is_empty());
        assert!(catalog.search(Axis::WallColor, "").is_empty());
    }

    #[test]
    fn palette_search_and_lookup() {
        let catalog = Catalog::builtin();
        let navy = WallColor::new(0x1e, 0x3a, 0x5c);

        assert_eq!(catalog.palette_entry(navy).unwrap().name, "Navy Depths");
        assert!(catalog.palette_entry(WallColor::new(1, 2, 3)).is_none());

        let hits = catalog.search_palette("#1e3a");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].color, navy);
    }

    #[test]
    fn axis_category_ids() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_category_id(axis.category_id()), Some(axis));
        }
        assert_eq!(Axis::Cabinet.title(), "Cabinet Styles");
        assert_eq!(Axis::from_category_id("lighting"), None);
    }
}
