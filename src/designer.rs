//! Kitchen design session.

use std::future::Future;
use std::sync::Arc;

use crate::asset::AssetSource;
use crate::catalog::Catalog;
use crate::color::WallColor;
use crate::error::{ExportError, ResolveError, SelectionError};
use crate::export::{ExportEngine, ExportHandle, ExportSettings, ExportedImage};
use crate::resolve::ResolvedView;
use crate::selection::{SelectionState, SelectionStore};
use crate::snapshot::{DesignSnapshot, Restorable};
use crate::summary::DesignSummary;

// ============================================================================
// KitchenDesigner
// ============================================================================

/// One user's design session.
///
/// `KitchenDesigner` ties a [`SelectionStore`] to an [`ExportEngine`]. The
/// view is derived on every call to [`view`](Self::view); nothing is cached
/// between selection changes.
///
/// # Example
///
/// ```
/// use kitchen_renderer::{Catalog, ExportSettings, KitchenDesigner, MemoryAssets};
/// use std::sync::Arc;
///
/// let mut designer = KitchenDesigner::new(
///     Arc::new(Catalog::builtin()),
///     Arc::new(MemoryAssets::new()),
///     ExportSettings::default(),
/// );
///
/// designer.set_wall_color("#1e3a5c".parse().unwrap()).unwrap();
/// designer.set_cabinet("white-shaker").unwrap();
///
/// let view = designer.view().unwrap();
/// assert_eq!(view.overlay.opacity, 0.25);
///
/// let summary = designer.summary();
/// assert_eq!(summary.lines[1].label, "White Shaker Cabinets");
/// ```
pub struct KitchenDesigner {
    store: SelectionStore,
    engine: Arc<ExportEngine>,
}

impl KitchenDesigner {
    /// Creates a session at the catalog's default selection.
    pub fn new(
        catalog: Arc<Catalog>,
        assets: Arc<dyn AssetSource>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            store: SelectionStore::new(catalog),
            engine: Arc::new(ExportEngine::new(assets, settings)),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.store.catalog()
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn engine(&self) -> &ExportEngine {
        &self.engine
    }

    pub fn set_wall_color(&mut self, color: WallColor) -> Result<bool, SelectionError> {
        self.store.set_wall_color(color)
    }

    pub fn set_cabinet(&mut self, id: &str) -> Result<bool, SelectionError> {
        self.store.set_cabinet(id)
    }

    pub fn set_backsplash(&mut self, id: &str) -> Result<bool, SelectionError> {
        self.store.set_backsplash(id)
    }

    pub fn set_flooring(&mut self, id: &str) -> Result<bool, SelectionError> {
        self.store.set_flooring(id)
    }

    /// Restores the catalog defaults.
    pub fn reset(&mut self) -> bool {
        self.store.reset()
    }

    pub fn state(&self) -> SelectionState {
        self.store.state()
    }

    /// Returns the selection version; see [`SelectionStore::version`].
    pub fn version(&self) -> u64 {
        self.store.version()
    }

    /// Resolves the current selection.
    pub fn view(&self) -> Result<ResolvedView, ResolveError> {
        self.store.resolve()
    }

    /// Builds the "Current Design" summary.
    pub fn summary(&self) -> DesignSummary {
        DesignSummary::new(self.store.catalog(), &self.store.state())
    }

    /// Exports the current selection.
    ///
    /// The selection is resolved now. The returned future owns that view
    /// and does not borrow the session, so selections may keep changing
    /// while it runs without affecting the output.
    pub fn export(
        &self,
        handle: &ExportHandle,
    ) -> impl Future<Output = Result<ExportedImage, ExportError>> + Send + use<> {
        let view = self.view();
        let engine = Arc::clone(&self.engine);
        let handle = handle.clone();

        async move {
            let view = view?;
            engine.export(&view, &handle).await
        }
    }

    /// Returns the current design for the persistence collaborator.
    ///
    /// Nothing is written here; storing the snapshot is the caller's job.
    pub fn save(&self) -> DesignSnapshot {
        let snapshot = self.export_snapshot();
        tracing::info!(
            wall_color = %snapshot.wall_color,
            cabinet = %snapshot.cabinet,
            backsplash = %snapshot.backsplash,
            flooring = %snapshot.flooring,
            "design saved"
        );
        snapshot
    }

    /// Restores a saved design. Nothing changes if any value is invalid.
    pub fn restore(&mut self, snapshot: &DesignSnapshot) -> Result<bool, SelectionError> {
        self.apply_snapshot(snapshot)
    }
}

impl Restorable for KitchenDesigner {
    fn apply_snapshot(&mut self, snapshot: &DesignSnapshot) -> Result<bool, SelectionError> {
        self.store.apply_snapshot(snapshot)
    }

    fn export_snapshot(&self) -> DesignSnapshot {
        self.store.export_snapshot()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetRef, MemoryAssets};
    use crate::catalog::Axis;
    use crate::resolve::BlendMode;
    use image::{Rgba, RgbaImage};

    const DEFAULT_ASSET: &str = "kitchens/natural-wood_subway_light-oak.jpg";

    fn designer_with(assets: MemoryAssets) -> KitchenDesigner {
        KitchenDesigner::new(
            Arc::new(Catalog::builtin()),
            Arc::new(assets),
            ExportSettings::default(),
        )
    }

    fn white_kitchen() -> MemoryAssets {
        MemoryAssets::new().with_image(
            DEFAULT_ASSET,
            RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255])),
        )
    }

    #[test]
    fn initial_view_has_no_tint() {
        let designer = designer_with(MemoryAssets::new());
        let view = designer.view().unwrap();

        assert_eq!(view.base, AssetRef::new(DEFAULT_ASSET));
        assert_eq!(view.overlay.opacity, 0.0);
    }

    #[test]
    fn wall_color_change_keeps_base() {
        let mut designer = designer_with(MemoryAssets::new());
        let before = designer.view().unwrap();

        assert!(designer.set_wall_color("#1e3a5c".parse().unwrap()).unwrap());
        let after = designer.view().unwrap();

        assert_eq!(after.base, before.base);
        assert_eq!(after.overlay.color.to_string(), "#1e3a5c");
        assert_eq!(after.overlay.opacity, 0.25);
        assert_eq!(after.overlay.blend_mode, BlendMode::Multiply);
    }

    #[test]
    fn invalid_cabinet_keeps_prior_selection() {
        let mut designer = designer_with(MemoryAssets::new());
        designer.set_cabinet("navy-blue").unwrap();

        let err = designer.set_cabinet("unknown-id").unwrap_err();
        assert_eq!(
            err,
            SelectionError::InvalidSelection {
                axis: Axis::Cabinet,
                id: "unknown-id".into()
            }
        );
        assert_eq!(designer.view().unwrap().requested.cabinet, "navy-blue");
    }

    #[test]
    fn save_and_restore() {
        let mut designer = designer_with(MemoryAssets::new());
        designer.set_flooring("dark-walnut").unwrap();
        designer.set_wall_color(WallColor::new(10, 20, 30)).unwrap();
        let saved = designer.save();

        designer.reset();
        assert_eq!(designer.state().flooring, "light-oak");

        assert!(designer.restore(&saved).unwrap());
        assert_eq!(designer.state().flooring, "dark-walnut");
        assert_eq!(designer.state().wall_color, WallColor::new(10, 20, 30));
    }

    #[test]
    fn invalid_restore_changes_nothing() {
        let mut designer = designer_with(MemoryAssets::new());
        designer.set_cabinet("sage-green").unwrap();
        let version = designer.version();

        let mut snapshot = designer.save();
        snapshot.cabinet = "white-shaker".into();
        snapshot.backsplash = "granite".into();

        assert!(designer.restore(&snapshot).is_err());
        assert_eq!(designer.state().cabinet, "sage-green");
        assert_eq!(designer.version(), version);
    }

    #[test]
    fn summary_follows_selection() {
        let mut designer = designer_with(MemoryAssets::new());
        designer.set_backsplash("herringbone").unwrap();
        designer
            .set_wall_color(designer.catalog().palette()[1].color)
            .unwrap();

        let summary = designer.summary();
        assert_eq!(
            summary.line(Axis::Backsplash).unwrap().label,
            "Herringbone Backsplash"
        );
        assert_eq!(
            summary.line(Axis::WallColor).unwrap().label,
            designer.catalog().palette()[1].name
        );
    }

    #[tokio::test]
    async fn export_with_failed_asset_leaves_state_unchanged() {
        let mut designer = designer_with(MemoryAssets::new());
        designer.set_wall_color(WallColor::new(0x1e, 0x3a, 0x5c)).unwrap();
        let state = designer.state();
        let version = designer.version();

        let err = designer.export(&ExportHandle::new()).await.unwrap_err();

        assert!(matches!(err, ExportError::AssetUnavailable { .. }));
        assert_eq!(
            err.user_message(),
            "There was an error downloading your design. Please try again."
        );
        assert_eq!(designer.state(), state);
        assert_eq!(designer.version(), version);
    }

    #[tokio::test]
    async fn export_uses_selection_at_call_time() {
        let mut designer = designer_with(white_kitchen());
        designer.set_wall_color(WallColor::new(0x1e, 0x3a, 0x5c)).unwrap();

        let pending = designer.export(&ExportHandle::new());
        designer.set_wall_color(WallColor::NEUTRAL).unwrap();
        designer.set_cabinet("charcoal-gray").unwrap();

        let exported = pending.await.unwrap();
        let pixels = image::load_from_memory(&exported.bytes).unwrap().to_rgba8();
        assert_eq!(pixels.get_pixel(0, 0).0, [199, 206, 214, 255]);
        assert_eq!(
            exported.file_name,
            "kitchen-design-natural-wood-subway-light-oak.png"
        );
    }
}
