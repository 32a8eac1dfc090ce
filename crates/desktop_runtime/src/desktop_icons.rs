//! Desktop icon placement: drag-end commits, grid snapping, and "Sort Icons".

use crate::{
    config::IconGrid,
    model::{DesktopState, IconId, Point},
    reducer::ReducerError,
};

/// Nearest grid cell origin for `point`. Never left of or above the grid origin.
pub fn snap_to_grid(grid: &IconGrid, point: Point) -> Point {
    let col = ((point.x - grid.origin_x) / grid.cell_width).round().max(0.0);
    let row = ((point.y - grid.origin_y) / grid.cell_height).round().max(0.0);
    Point::new(
        grid.origin_x + col * grid.cell_width,
        grid.origin_y + row * grid.cell_height,
    )
}

/// Origin of the `index`-th cell when filling columns top to bottom.
pub fn grid_slot(grid: &IconGrid, index: usize) -> Point {
    let rows = grid.rows.max(1) as usize;
    let col = (index / rows) as f64;
    let row = (index % rows) as f64;
    Point::new(
        grid.origin_x + col * grid.cell_width,
        grid.origin_y + row * grid.cell_height,
    )
}

/// Commits a dropped icon position, translated from client coordinates to the desktop's.
///
/// Snaps to the icon grid while align-to-grid is on. Returns `false` when the position is
/// unchanged.
pub fn end_icon_drag(
    state: &mut DesktopState,
    icon_id: IconId,
    client_position: Point,
    parent_origin: Point,
) -> Result<bool, ReducerError> {
    let grid = state.metrics.icon_grid;
    let align = state.align_to_grid;
    let icon = state
        .icon_mut(icon_id)
        .ok_or(ReducerError::IconNotFound(icon_id))?;

    let mut position = Point::new(
        client_position.x - parent_origin.x,
        client_position.y - parent_origin.y,
    );
    if align {
        position = snap_to_grid(&grid, position);
    }
    if icon.position == position {
        return Ok(false);
    }
    icon.position = position;
    Ok(true)
}

/// Lays every icon out on the grid in label order, filling columns first.
pub fn sort_icons(state: &mut DesktopState) -> bool {
    let grid = state.metrics.icon_grid;
    let mut icons: Vec<_> = state
        .applications
        .iter_mut()
        .flat_map(|app| app.desktop_icons.iter_mut())
        .collect();
    icons.sort_by(|a, b| {
        a.label
            .to_lowercase()
            .cmp(&b.label.to_lowercase())
            .then(a.id.cmp(&b.id))
    });

    let mut changed = false;
    for (index, icon) in icons.into_iter().enumerate() {
        let slot = grid_slot(&grid, index);
        if icon.position != slot {
            icon.position = slot;
            changed = true;
        }
    }
    changed
}

/// Snaps every icon onto the grid, keeping each in its nearest cell.
pub fn snap_all(state: &mut DesktopState) -> bool {
    let grid = state.metrics.icon_grid;
    let mut changed = false;
    for icon in state
        .applications
        .iter_mut()
        .flat_map(|app| app.desktop_icons.iter_mut())
    {
        let snapped = snap_to_grid(&grid, icon.position);
        if icon.position != snapped {
            icon.position = snapped;
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::apps::test_catalog;

    fn desktop() -> DesktopState {
        DesktopState::from_catalog(Default::default(), &test_catalog())
    }

    fn first_icon(state: &DesktopState) -> IconId {
        state.icons().next().map(|icon| icon.id()).expect("icon")
    }

    #[test]
    fn drag_end_translates_to_parent_coordinates() {
        let mut state = desktop();
        let icon = first_icon(&state);

        let moved = end_icon_drag(
            &mut state,
            icon,
            Point::new(250.0, 330.0),
            Point::new(50.0, 30.0),
        )
        .expect("drag end");

        assert!(moved);
        assert_eq!(state.icon(icon).map(|i| i.position()), Some(Point::new(200.0, 300.0)));
        let again = end_icon_drag(
            &mut state,
            icon,
            Point::new(250.0, 330.0),
            Point::new(50.0, 30.0),
        )
        .expect("drag end");
        assert!(!again);
    }

    #[test]
    fn drag_end_snaps_when_aligned() {
        let mut state = desktop();
        state.align_to_grid = true;
        let icon = first_icon(&state);

        end_icon_drag(&mut state, icon, Point::new(130.0, 200.0), Point::default())
            .expect("drag end");

        assert_eq!(
            state.icon(icon).map(|i| i.position()),
            Some(Point::new(112.0, 224.0))
        );
    }

    #[test]
    fn snapping_never_leaves_the_grid_origin() {
        let grid = IconGrid::default();
        assert_eq!(
            snap_to_grid(&grid, Point::new(-300.0, -40.0)),
            Point::new(16.0, 16.0)
        );
    }

    #[test]
    fn sort_orders_by_label_down_columns() {
        let mut state = desktop();
        let ids: Vec<_> = state.icons().map(|icon| icon.id()).collect();
        for (idx, id) in ids.iter().enumerate() {
            end_icon_drag(
                &mut state,
                *id,
                Point::new(500.0 - idx as f64 * 10.0, 400.0),
                Point::default(),
            )
            .expect("drag end");
        }

        assert!(sort_icons(&mut state));
        assert!(!sort_icons(&mut state));

        let placed: Vec<_> = state
            .icons()
            .map(|icon| (icon.label().to_string(), icon.position()))
            .collect();
        assert_eq!(
            placed,
            vec![
                ("i ❤ technology".to_string(), Point::new(16.0, 120.0)),
                ("Explorer".to_string(), Point::new(16.0, 16.0)),
            ]
        );
    }

    #[test]
    fn grid_slots_wrap_into_next_column() {
        let grid = IconGrid::default();
        assert_eq!(grid_slot(&grid, 5), Point::new(16.0, 16.0 + 5.0 * 104.0));
        assert_eq!(grid_slot(&grid, 6), Point::new(112.0, 16.0));
    }

    #[test]
    fn unknown_icon_is_reported() {
        let mut state = desktop();
        assert_eq!(
            end_icon_drag(&mut state, IconId(99), Point::default(), Point::default()),
            Err(ReducerError::IconNotFound(IconId(99)))
        );
    }
}
