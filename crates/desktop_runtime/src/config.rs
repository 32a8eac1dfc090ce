//! Shell metrics: timing, size limits, stacking bases, and menu dimensions.
//!
//! Every field has a default matching the stock desktop theme, so a TOML override only needs the
//! keys it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Rect;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Configuration and app-catalog loading errors.
pub enum ConfigError {
    /// TOML shell metrics failed to parse.
    #[error("failed to parse shell metrics: {0}")]
    Parse(String),
    /// The generated app catalog failed to parse.
    #[error("failed to parse app catalog: {0}")]
    Catalog(String),
    /// A catalog entry names an application this runtime does not know.
    #[error("unknown app id `{0}` in catalog")]
    UnknownApp(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Context-menu dimensions used by the menu geometry engine.
pub struct MenuMetrics {
    /// Fixed menu width.
    pub width: f64,
    /// Combined top and bottom padding.
    pub padding: f64,
    /// Height of a regular item, padding included.
    pub item_height: f64,
    /// Height of a divider, margins included.
    pub divider_height: f64,
    /// Band kept free above the bottom edge of the bounding region.
    pub taskbar_reserve: f64,
}

impl Default for MenuMetrics {
    fn default() -> Self {
        Self {
            width: 220.0,
            padding: 12.0,
            item_height: 36.0,
            divider_height: 13.0,
            taskbar_reserve: 13.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Cell layout used by "Sort Icons" and by align-to-grid snapping.
pub struct IconGrid {
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    /// Icons per column before wrapping to the next column.
    pub rows: u32,
}

impl Default for IconGrid {
    fn default() -> Self {
        Self {
            origin_x: 16.0,
            origin_y: 16.0,
            cell_width: 96.0,
            cell_height: 104.0,
            rows: 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Tunable shell constants.
pub struct ShellMetrics {
    /// Delay before a minimize/maximize/restore transition settles.
    pub transition_delay_ms: u64,
    /// Smallest width a resize may produce.
    pub min_window_width: f64,
    /// Smallest height a resize may produce.
    pub min_window_height: f64,
    /// Band kept free above the container's bottom edge while resizing.
    pub resize_taskbar_band: f64,
    /// z-index of the most recently activated window.
    pub window_z_base: u32,
    /// z-index of the most recently activated desktop icon.
    pub icon_z_base: u32,
    /// Geometry of a freshly created window before cascading.
    pub default_window_rect: Rect,
    /// Cascade step applied per already-open window of the same application.
    pub cascade_step: f64,
    pub menu: MenuMetrics,
    pub icon_grid: IconGrid,
}

impl Default for ShellMetrics {
    fn default() -> Self {
        Self {
            transition_delay_ms: 300,
            min_window_width: 200.0,
            min_window_height: 150.0,
            resize_taskbar_band: 48.0,
            window_z_base: 1000,
            icon_z_base: 100,
            default_window_rect: Rect::new(50.0, 50.0, 800.0, 600.0),
            cascade_step: 20.0,
            menu: MenuMetrics::default(),
            icon_grid: IconGrid::default(),
        }
    }
}

impl ShellMetrics {
    /// Parses metrics from TOML, filling missing keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid TOML for this shape.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let metrics = ShellMetrics::from_toml_str("").expect("parse empty metrics");
        assert_eq!(metrics, ShellMetrics::default());
        assert_eq!(metrics.transition_delay_ms, 300);
        assert_eq!(metrics.menu.width, 220.0);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let metrics = ShellMetrics::from_toml_str(
            "transition_delay_ms = 120\n\n[menu]\nwidth = 260.0\n",
        )
        .expect("parse metrics override");

        assert_eq!(metrics.transition_delay_ms, 120);
        assert_eq!(metrics.menu.width, 260.0);
        assert_eq!(metrics.menu.item_height, 36.0);
        assert_eq!(metrics.min_window_width, 200.0);
    }

    #[test]
    fn malformed_document_reports_parse_error() {
        let err = ShellMetrics::from_toml_str("transition_delay_ms = \"soon\"")
            .expect_err("string delay should fail");
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse shell metrics"));
    }
}
