//! Serializable selection snapshots for persistence and sharing.
//!
//! A [`DesignSnapshot`] captures the four axis values in a format that can be
//! serialized to JSON and handed to a save or share collaborator.
//!
//! # Example
//!
//! ```
//! use kitchen_renderer::{Catalog, DesignSnapshot, Restorable, SelectionStore};
//! use std::sync::Arc;
//!
//! let mut store = SelectionStore::new(Arc::new(Catalog::builtin()));
//! store.set_cabinet("navy-blue").unwrap();
//!
//! let json = store.export_snapshot().to_json().unwrap();
//!
//! let mut other = SelectionStore::new(Arc::new(Catalog::builtin()));
//! other.apply_snapshot(&DesignSnapshot::from_json(&json).unwrap()).unwrap();
//! assert_eq!(other.state().cabinet, "navy-blue");
//! ```
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "wallColor": "#1e3a5c",
//!   "cabinet": "natural-wood",
//!   "backsplash": "subway",
//!   "flooring": "light-oak"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::color::WallColor;
use crate::error::SelectionError;

/// The four selection values as stable, serializable scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct DesignSnapshot {
    pub wall_color: WallColor,
    pub cabinet: String,
    pub backsplash: String,
    pub flooring: String,
}

impl DesignSnapshot {
    /// Serializes the snapshot to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the snapshot to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a snapshot from a JSON string.
    ///
    /// This only checks syntax. Catalog membership is checked when the
    /// snapshot is applied through [`Restorable::apply_snapshot`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Types whose selection can be exported to and restored from a [`DesignSnapshot`].
pub trait Restorable {
    /// Applies every value in the snapshot, or none of them.
    ///
    /// Returns true if anything changed.
    fn apply_snapshot(&mut self, snapshot: &DesignSnapshot) -> Result<bool, SelectionError>;

    /// Exports the current selection.
    fn export_snapshot(&self) -> DesignSnapshot;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DesignSnapshot {
        DesignSnapshot {
            wall_color: WallColor::new(0x1e, 0x3a, 0x5c),
            cabinet: "natural-wood".into(),
            backsplash: "subway".into(),
            flooring: "light-oak".into(),
        }
    }

    #[test]
    fn snapshot_json_format() {
        let json = sample().to_json().unwrap();
        assert_eq!(
            json,
            r##"{"wallColor":"#1e3a5c","cabinet":"natural-wood","backsplash":"subway","flooring":"light-oak"}"##
        );
    }

    #[test]
    fn snapshot_roundtrip_preserves_values() {
        let json = sample().to_json_pretty().unwrap();
        assert_eq!(DesignSnapshot::from_json(&json).unwrap(), sample());
    }

    #[test]
    fn snapshot_rejects_bad_color() {
        let json = r#"{"wallColor":"teal","cabinet":"a","backsplash":"b","flooring":"c"}"#;
        assert!(DesignSnapshot::from_json(json).is_err());
    }

    #[test]
    fn snapshot_requires_every_axis() {
        let json = r##"{"wallColor":"#ffffff","cabinet":"a","backsplash":"b"}"##;
        assert!(DesignSnapshot::from_json(json).is_err());
    }
}
