//! Export of the resolved view as a downloadable image.
//!
//! [`ExportEngine::export`] loads the base asset, flattens the wall color
//! overlay onto it and encodes the result. The work runs on a blocking
//! worker so the caller's runtime keeps serving selection changes, and the
//! view is copied when the export starts so later changes are never seen.
//!
//! # Example
//!
//! ```no_run
//! use kitchen_renderer::{
//!     Catalog, DirectoryAssets, ExportEngine, ExportHandle, ExportSettings, SelectionStore,
//! };
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SelectionStore::new(Arc::new(Catalog::builtin()));
//! let engine = ExportEngine::new(
//!     Arc::new(DirectoryAssets::new("assets")),
//!     ExportSettings::default(),
//! );
//!
//! let view = store.resolve()?;
//! let exported = engine.export(&view, &ExportHandle::new()).await?;
//! std::fs::write(&exported.file_name, &exported.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod composite;
pub mod encode;

pub use composite::apply_overlay;
pub use encode::{DEFAULT_JPEG_QUALITY, ExportFormat};

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::asset::AssetSource;
use crate::error::ExportError;
use crate::resolve::ResolvedView;

// ============================================================================
// Settings
// ============================================================================

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ExportSettings {
    /// Output format.
    pub format: ExportFormat,
    /// Leading part of the suggested file name.
    pub file_stem: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            file_stem: "kitchen-design".to_string(),
        }
    }
}

impl ExportSettings {
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }
}

// ============================================================================
// ExportedImage
// ============================================================================

/// A complete, encoded export.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportedImage {
    /// Encoded file contents.
    pub bytes: Vec<u8>,
    /// Suggested file name, e.g. `kitchen-design-natural-wood-subway-light-oak.png`.
    pub file_name: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

impl fmt::Debug for ExportedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedImage")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

// ============================================================================
// ExportHandle (cancellation)
// ============================================================================

/// Handle to cancel an in-progress export.
///
/// Cancellation is checked between the load, composite and encode stages.
/// A cancelled export returns [`ExportError::Cancelled`] and no bytes.
#[derive(Clone, Default)]
pub struct ExportHandle {
    cancel_flag: Arc<AtomicBool>,
}

impl ExportHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for ExportHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportHandle")
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}

// ============================================================================
// In-flight guard
// ============================================================================

/// Marks the engine busy until dropped.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ============================================================================
// ExportEngine
// ============================================================================

/// Composes resolved views into encoded image files.
///
/// At most one export runs at a time; a second request while one is in
/// flight fails fast with [`ExportError::Busy`]. Exports never retry and
/// never return partial output.
pub struct ExportEngine {
    assets: Arc<dyn AssetSource>,
    settings: ExportSettings,
    in_flight: Arc<AtomicBool>,
}

impl ExportEngine {
    pub fn new(assets: Arc<dyn AssetSource>, settings: ExportSettings) -> Self {
        Self {
            assets,
            settings,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Returns true while an export is running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Exports a view asynchronously.
    ///
    /// The view is copied before this returns its first `Pending`. The work
    /// runs on tokio's blocking pool and holds the busy flag until it
    /// finishes; if the caller drops this future the work still completes
    /// or fails on its own and the result is discarded.
    pub async fn export(
        &self,
        view: &ResolvedView,
        handle: &ExportHandle,
    ) -> Result<ExportedImage, ExportError> {
        let guard = InFlightGuard::acquire(&self.in_flight).ok_or(ExportError::Busy)?;
        let job = self.job(view, handle);

        tracing::debug!(base = %job.view.base, "starting export");
        match tokio::task::spawn_blocking(move || {
            let _guard = guard;
            job.run()
        })
        .await
        {
            Ok(result) => result,
            Err(e) => Err(ExportError::EncodingFailure {
                reason: format!("export worker failed: {e}"),
            }),
        }
    }

    /// Exports a view on the current thread.
    pub fn export_blocking(
        &self,
        view: &ResolvedView,
        handle: &ExportHandle,
    ) -> Result<ExportedImage, ExportError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(ExportError::Busy)?;
        self.job(view, handle).run()
    }

    fn job(&self, view: &ResolvedView, handle: &ExportHandle) -> ExportJob {
        ExportJob {
            view: view.clone(),
            assets: Arc::clone(&self.assets),
            settings: self.settings.clone(),
            handle: handle.clone(),
        }
    }
}

impl fmt::Debug for ExportEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportEngine")
            .field("settings", &self.settings)
            .field("is_busy", &self.is_busy())
            .finish()
    }
}

/// Everything one export needs, owned so it can move to a worker thread.
struct ExportJob {
    view: ResolvedView,
    assets: Arc<dyn AssetSource>,
    settings: ExportSettings,
    handle: ExportHandle,
}

impl ExportJob {
    fn run(self) -> Result<ExportedImage, ExportError> {
        self.checkpoint()?;

        let mut image = self.assets.load(&self.view.base).map_err(|source| {
            tracing::warn!(base = %self.view.base, error = %source, "base asset unavailable");
            ExportError::AssetUnavailable {
                asset: self.view.base.clone(),
                source,
            }
        })?;
        self.checkpoint()?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ExportError::EncodingFailure {
                reason: format!("base asset `{}` has no pixels", self.view.base),
            });
        }

        apply_overlay(&mut image, &self.view.overlay);
        self.checkpoint()?;

        let format = self.settings.format;
        let bytes = encode::encode(image, format).map_err(|reason| {
            tracing::warn!(%reason, "failed to encode export");
            ExportError::EncodingFailure { reason }
        })?;
        self.checkpoint()?;

        let file_name = suggested_file_name(&self.settings, &self.view);
        tracing::info!(%file_name, width, height, bytes = bytes.len(), "export complete");

        Ok(ExportedImage {
            bytes,
            file_name,
            mime_type: format.mime_type(),
            width,
            height,
        })
    }

    fn checkpoint(&self) -> Result<(), ExportError> {
        if self.handle.is_cancelled() {
            tracing::debug!("export cancelled");
            Err(ExportError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Builds `<stem>-<cabinet>-<backsplash>-<flooring>.<ext>` from the requested
/// combination, replacing anything unsafe in a file name with `-`.
pub fn suggested_file_name(settings: &ExportSettings, view: &ResolvedView) -> String {
    let requested = &view.requested;
    let stem = [
        settings.file_stem.as_str(),
        &requested.cabinet,
        &requested.backsplash,
        &requested.flooring,
    ]
    .iter()
    .filter(|part| !part.is_empty())
    .map(|part| sanitize(part))
    .collect::<Vec<_>>()
    .join("-");

    format!("{}.{}", stem, settings.format.extension())
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
