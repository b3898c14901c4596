//! Human-readable summary of the current design.

use serde::{Deserialize, Serialize};

use crate::catalog::{Axis, Catalog};
use crate::color::WallColor;
use crate::selection::SelectionState;

/// One line of the "Current Design" card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct SummaryLine {
    pub axis: Axis,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swatch: Option<WallColor>,
}

/// A line per axis, in picker order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct DesignSummary {
    pub lines: Vec<SummaryLine>,
}

impl DesignSummary {
    /// Builds the summary for a state.
    ///
    /// A palette color is labelled with its palette name; any other wall
    /// color is shown as "Wall Color" with a "Custom" badge. Catalog items
    /// are labelled "<name> <axis noun>", e.g. "Natural Wood Cabinets".
    pub fn new(catalog: &Catalog, state: &SelectionState) -> Self {
        let wall = match catalog.palette_entry(state.wall_color) {
            Some(entry) => SummaryLine {
                axis: Axis::WallColor,
                label: entry.name.clone(),
                badge: None,
                swatch: Some(state.wall_color),
            },
            None => SummaryLine {
                axis: Axis::WallColor,
                label: Axis::WallColor.item_noun().to_string(),
                badge: Some("Custom".to_string()),
                swatch: Some(state.wall_color),
            },
        };

        let mut lines = vec![wall];
        for (axis, id) in [
            (Axis::Cabinet, &state.cabinet),
            (Axis::Backsplash, &state.backsplash),
            (Axis::Flooring, &state.flooring),
        ] {
            let line = match catalog.item(axis, id) {
                Some(item) => SummaryLine {
                    axis,
                    label: format!("{} {}", item.name, axis.item_noun()),
                    badge: item.badge.clone(),
                    swatch: item.swatch,
                },
                None => SummaryLine {
                    axis,
                    label: id.clone(),
                    badge: None,
                    swatch: None,
                },
            };
            lines.push(line);
        }

        Self { lines }
    }

    /// Returns the line for an axis.
    pub fn line(&self, axis: Axis) -> Option<&SummaryLine> {
        self.lines.iter().find(|line| line.axis == axis)
    }
}
