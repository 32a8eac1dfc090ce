//! Menu sizing and placement.
//!
//! Menus have a fixed width and a height derived from their items. Placement clamps a proposed
//! origin against each edge of the bounding region once, in right, left, bottom, top order. A
//! region smaller than the menu can therefore still produce an out-of-bounds origin; callers
//! accept that rather than iterating.

use crate::{
    config::MenuMetrics,
    model::{Bounds, MenuItem, Rect},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl MenuMetrics {
    /// Total menu height: padding plus one row per item.
    pub fn menu_height(&self, items: &[MenuItem]) -> f64 {
        items.iter().fold(self.padding, |total, item| {
            total
                + if item.divider {
                    self.divider_height
                } else {
                    self.item_height
                }
        })
    }

    /// Sizes the menu for `items` and clamps `(x, y)` into `bounds`.
    pub fn layout(&self, items: &[MenuItem], x: f64, y: f64, bounds: Bounds) -> MenuLayout {
        let width = self.width;
        let height = self.menu_height(items);
        let (x, y) = constrain_position(x, y, width, height, bounds, self.taskbar_reserve);
        MenuLayout {
            x,
            y,
            width,
            height,
        }
    }

    /// Origin for a taskbar menu: centered under `trigger`, pinned to `y = 0`.
    ///
    /// Taskbar menus open upward from their anchor, so the vertical origin is left to the anchor.
    pub fn anchored_under(&self, trigger: Rect) -> (f64, f64) {
        let x = trigger.left + trigger.width / 2.0 - self.width / 2.0;
        (x, 0.0)
    }
}

/// Clamps a `width`×`height` box at `(x, y)` into `bounds`, reserving `bottom_reserve` above the
/// bottom edge.
pub fn constrain_position(
    mut x: f64,
    mut y: f64,
    width: f64,
    height: f64,
    bounds: Bounds,
    bottom_reserve: f64,
) -> (f64, f64) {
    if x + width > bounds.right {
        x = bounds.right - width;
    }
    if x < bounds.left {
        x = bounds.left;
    }
    let max_bottom = bounds.bottom - bottom_reserve;
    if y + height > max_bottom {
        y = max_bottom - height;
    }
    if y < bounds.top {
        y = bounds.top;
    }
    (x, y)
}

/// [`MenuMetrics::layout`] with the stock menu metrics.
pub fn layout(items: &[MenuItem], x: f64, y: f64, bounds: Bounds) -> MenuLayout {
    MenuMetrics::default().layout(items, x, y, bounds)
}
