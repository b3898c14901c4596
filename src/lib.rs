//! kitchen-renderer: Kitchen customization state, resolution and export
//!
//! This crate holds the selection for a kitchen design (wall color,
//! cabinets, backsplash, flooring), resolves it into a base photo plus a
//! wall color overlay, and exports the composited result as an image file.
//!
//! # Example
//!
//! ```
//! use kitchen_renderer::{Catalog, SelectionStore, WallColor};
//! use std::sync::Arc;
//!
//! let mut store = SelectionStore::new(Arc::new(Catalog::builtin()));
//!
//! store.set_wall_color("#1e3a5c".parse::<WallColor>().unwrap()).unwrap();
//! store.set_cabinet("white-shaker").unwrap();
//!
//! // Derived fresh on every call
//! let view = store.resolve().unwrap();
//! assert_eq!(view.base.as_str(), "kitchens/white-shaker_subway_light-oak.jpg");
//! assert_eq!(view.overlay.opacity, 0.25);
//! ```
//!
//! # Saved Designs
//!
//! For persistence and sharing, use [`DesignSnapshot`] with the
//! [`Restorable`] trait:
//!
//! ```
//! use kitchen_renderer::{Catalog, DesignSnapshot, Restorable, SelectionStore};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::builtin());
//! let mut store = SelectionStore::new(Arc::clone(&catalog));
//! store.set_flooring("dark-walnut").unwrap();
//!
//! // Export current selection
//! let json = store.export_snapshot().to_json().unwrap();
//!
//! // Restore it elsewhere
//! let mut other = SelectionStore::new(catalog);
//! other.apply_snapshot(&DesignSnapshot::from_json(&json).unwrap()).unwrap();
//! assert_eq!(other.state().flooring, "dark-walnut");
//! ```
//!
//! # Export
//!
//! [`ExportEngine`] (or [`KitchenDesigner::export`]) loads the base asset
//! through an [`AssetSource`], applies the overlay and encodes PNG or JPEG.
//! One export runs at a time; see [`ExportError`] for the failure modes.

mod asset;
mod catalog;
mod color;
mod designer;
mod error;
mod export;
mod resolve;
mod selection;
mod snapshot;
mod summary;

pub use asset::{AssetRef, AssetSource, DirectoryAssets, MemoryAssets, decode_asset};
pub use catalog::{AssetEntry, Axis, Catalog, CatalogFile, CatalogItem, Combination, PaletteEntry};
pub use color::WallColor;
pub use designer::KitchenDesigner;
pub use error::{
    AssetError, CatalogError, ColorParseError, ExportError, ResolveError, SelectionError,
};
pub use export::{
    DEFAULT_JPEG_QUALITY, ExportEngine, ExportFormat, ExportHandle, ExportSettings, ExportedImage,
    apply_overlay, suggested_file_name,
};
pub use resolve::{BlendMode, OVERLAY_OPACITY, Overlay, ResolvedView, resolve};
pub use selection::{SelectionState, SelectionStore};
pub use snapshot::{DesignSnapshot, Restorable};
pub use summary::{DesignSummary, SummaryLine};
