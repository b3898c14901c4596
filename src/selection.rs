//! The selection store: single source of truth for the four axes.

use std::sync::Arc;

use crate::catalog::{Axis, Catalog, Combination};
use crate::color::WallColor;
use crate::error::{ResolveError, SelectionError};
use crate::resolve::{ResolvedView, resolve};
use crate::snapshot::{DesignSnapshot, Restorable};

// ============================================================================
// SelectionState
// ============================================================================

/// The current value of every customization axis.
///
/// Every field always holds a valid value for its axis; there is no unset
/// state once a store has been created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub wall_color: WallColor,
    pub cabinet: String,
    pub backsplash: String,
    pub flooring: String,
}

impl SelectionState {
    /// Returns the `(cabinet, backsplash, flooring)` triple.
    pub fn combination(&self) -> Combination {
        Combination::new(&self.cabinet, &self.backsplash, &self.flooring)
    }
}

impl From<DesignSnapshot> for SelectionState {
    fn from(snapshot: DesignSnapshot) -> Self {
        Self {
            wall_color: snapshot.wall_color,
            cabinet: snapshot.cabinet,
            backsplash: snapshot.backsplash,
            flooring: snapshot.flooring,
        }
    }
}

impl From<SelectionState> for DesignSnapshot {
    fn from(state: SelectionState) -> Self {
        Self {
            wall_color: state.wall_color,
            cabinet: state.cabinet,
            backsplash: state.backsplash,
            flooring: state.flooring,
        }
    }
}

// ============================================================================
// SelectionStore
// ============================================================================

/// Holds the selection and validates every mutation against the catalog.
///
/// Each setter returns `Ok(true)` if the state changed and `Ok(false)` if
/// the axis already held that value. Rejected values leave the state
/// untouched. The [`version`](Self::version) increments on every change
/// and only then, so a view can tell whether it needs to re-render.
///
/// Nothing derived from the state is cached here: call
/// [`resolve`](Self::resolve) on every render.
///
/// # Example
///
/// ```
/// use kitchen_renderer::{Catalog, SelectionStore, WallColor};
/// use std::sync::Arc;
///
/// let mut store = SelectionStore::new(Arc::new(Catalog::builtin()));
/// assert!(store.set_wall_color("#1e3a5c".parse().unwrap()).unwrap());
/// assert!(store.set_cabinet("unknown-id").is_err());
///
/// let view = store.resolve().unwrap();
/// assert_eq!(view.overlay.opacity, 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct SelectionStore {
    catalog: Arc<Catalog>,
    state: SelectionState,
    version: u64,
}

impl SelectionStore {
    /// Creates a store holding the catalog's default selection.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let state = catalog.default_state();
        Self {
            catalog,
            state,
            version: 0,
        }
    }

    /// Returns the catalog the store validates against.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> SelectionState {
        self.state.clone()
    }

    /// Returns the current version number.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sets the wall color. Every color is accepted.
    pub fn set_wall_color(&mut self, color: WallColor) -> Result<bool, SelectionError> {
        if self.state.wall_color == color {
            return Ok(false);
        }
        tracing::debug!(from = %self.state.wall_color, to = %color, "wall color changed");
        self.state.wall_color = color;
        self.bump();
        Ok(true)
    }

    /// Sets the cabinet style.
    pub fn set_cabinet(&mut self, id: &str) -> Result<bool, SelectionError> {
        self.set_item(Axis::Cabinet, id)
    }

    /// Sets the backsplash pattern.
    pub fn set_backsplash(&mut self, id: &str) -> Result<bool, SelectionError> {
        self.set_item(Axis::Backsplash, id)
    }

    /// Sets the flooring material.
    pub fn set_flooring(&mut self, id: &str) -> Result<bool, SelectionError> {
        self.set_item(Axis::Flooring, id)
    }

    /// Restores the catalog defaults.
    pub fn reset(&mut self) -> bool {
        let defaults = self.catalog.default_state();
        if self.state == defaults {
            return false;
        }
        self.state = defaults;
        self.bump();
        true
    }

    /// Resolves the current state to a displayable view.
    pub fn resolve(&self) -> Result<ResolvedView, ResolveError> {
        resolve(&self.catalog, &self.state)
    }

    fn set_item(&mut self, axis: Axis, id: &str) -> Result<bool, SelectionError> {
        self.check(axis, id)?;

        let slot = match axis {
            Axis::Cabinet => &mut self.state.cabinet,
            Axis::Backsplash => &mut self.state.backsplash,
            Axis::Flooring => &mut self.state.flooring,
            // check() rejects every id on the wall color axis
            Axis::WallColor => return Ok(false),
        };
        if *slot == id {
            return Ok(false);
        }

        tracing::debug!(%axis, from = %slot, to = id, "selection changed");
        *slot = id.to_string();
        self.bump();
        Ok(true)
    }

    fn check(&self, axis: Axis, id: &str) -> Result<(), SelectionError> {
        if self.catalog.contains(axis, id) {
            Ok(())
        } else {
            tracing::warn!(%axis, id, "rejected out-of-catalog selection");
            Err(SelectionError::InvalidSelection {
                axis,
                id: id.to_string(),
            })
        }
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

impl Restorable for SelectionStore {
    fn apply_snapshot(&mut self, snapshot: &DesignSnapshot) -> Result<bool, SelectionError> {
        // Validate everything before touching the state.
        self.check(Axis::Cabinet, &snapshot.cabinet)?;
        self.check(Axis::Backsplash, &snapshot.backsplash)?;
        self.check(Axis::Flooring, &snapshot.flooring)?;

        let restored = SelectionState::from(snapshot.clone());
        if self.state == restored {
            return Ok(false);
        }
        self.state = restored;
        self.bump();
        Ok(true)
    }

    fn export_snapshot(&self) -> DesignSnapshot {
        DesignSnapshot::from(self.state())
    }
}

// ============================================================================
// Tests
// ============================================================================
