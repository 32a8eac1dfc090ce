//! Activation and z-order arbitration across every application.
//!
//! Windows and desktop icons form two independent pools. Activating an entity stamps it with the
//! next recency value and re-ranks its entire pool: members are sorted by recency (stable, so
//! ties keep collection order), the first one gets the pool's base z-index and the only `active`
//! flag, and each following rank sits one below. Ranking is a total recompute, so running it twice
//! without an intervening activation yields the same result.

use crate::{
    model::{DesktopState, IconId, WindowId},
    reducer::ReducerError,
};

/// Makes `window_id` the single active window and restacks all windows.
///
/// Closed windows are left untouched.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when no application owns `window_id`.
pub fn activate_window(state: &mut DesktopState, window_id: WindowId) -> Result<(), ReducerError> {
    let stamp = state.next_activation_stamp();
    let window = state
        .window_mut(window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))?;
    if window.closed {
        return Ok(());
    }
    window.last_activated = stamp;
    rank_windows(state);
    Ok(())
}

/// Makes `icon_id` the single active desktop icon and restacks all icons.
///
/// # Errors
///
/// Returns [`ReducerError::IconNotFound`] when no application owns `icon_id`.
pub fn activate_icon(state: &mut DesktopState, icon_id: IconId) -> Result<(), ReducerError> {
    let stamp = state.next_activation_stamp();
    let icon = state
        .icon_mut(icon_id)
        .ok_or(ReducerError::IconNotFound(icon_id))?;
    icon.last_activated = stamp;
    rank_icons(state);
    Ok(())
}

/// Recomputes z-index and `active` for every open window.
pub fn rank_windows(state: &mut DesktopState) {
    stack_windows(state, true);
}

/// Recomputes window z-indices only, leaving `active` as it is. Used after windows leave the
/// pool so the ranks stay contiguous.
pub fn restack_windows(state: &mut DesktopState) {
    stack_windows(state, false);
}

fn stack_windows(state: &mut DesktopState, assign_active: bool) {
    let base = state.metrics.window_z_base;
    let mut pool: Vec<_> = state
        .applications
        .iter_mut()
        .flat_map(|app| app.windows.iter_mut())
        .filter(|window| !window.closed)
        .collect();
    pool.sort_by(|a, b| b.last_activated.cmp(&a.last_activated));

    for (rank, window) in pool.into_iter().enumerate() {
        window.z_index = base.saturating_sub(rank as u32);
        if assign_active {
            window.active = rank == 0;
        }
    }
}

/// Recomputes z-index and `active` for every desktop icon.
pub fn rank_icons(state: &mut DesktopState) {
    let base = state.metrics.icon_z_base;
    let mut pool: Vec<_> = state
        .applications
        .iter_mut()
        .flat_map(|app| app.desktop_icons.iter_mut())
        .collect();
    pool.sort_by(|a, b| b.last_activated.cmp(&a.last_activated));

    for (rank, icon) in pool.into_iter().enumerate() {
        icon.z_index = base.saturating_sub(rank as u32);
        icon.active = rank == 0;
    }
}

/// Clears `active` on every window without touching the stacking order.
pub fn deactivate_windows(state: &mut DesktopState) {
    for window in state
        .applications
        .iter_mut()
        .flat_map(|app| app.windows.iter_mut())
    {
        window.active = false;
    }
}

/// Clears `active` in both pools without touching the stacking order.
pub fn deactivate_all(state: &mut DesktopState) {
    deactivate_windows(state);
    for icon in state
        .applications
        .iter_mut()
        .flat_map(|app| app.desktop_icons.iter_mut())
    {
        icon.active = false;
    }
}
