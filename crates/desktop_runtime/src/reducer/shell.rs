//! Reducer helpers for taskbar, desktop, icon, and theme actions.

use crate::{
    activation, desktop_icons, menus,
    model::{AppId, DesktopState, InteractionState},
    reducer::{open_window, DesktopAction, ReducerError, RuntimeEffect},
    window_manager,
};

pub(super) fn reduce_shell_action(
    state: &mut DesktopState,
    _interaction: &mut InteractionState,
    action: &DesktopAction,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<bool, ReducerError> {
    let metrics = state.metrics;
    match action {
        DesktopAction::ActivateIcon { icon_id } => {
            activation::activate_icon(state, *icon_id)?;
        }
        DesktopAction::EndIconDrag {
            icon_id,
            client_position,
            parent_origin,
        } => {
            desktop_icons::end_icon_drag(state, *icon_id, *client_position, *parent_origin)?;
        }
        DesktopAction::OpenIcon { icon_id } => {
            let app_id = state
                .icon(*icon_id)
                .map(|icon| icon.app_id())
                .ok_or(ReducerError::IconNotFound(*icon_id))?;
            let window_id = open_window(state, app_id)?;
            if let Some(window) = state.window_mut(window_id) {
                if window.minimized() {
                    window_manager::request_restore(window, &metrics, effects);
                }
            }
        }
        DesktopAction::IconContextMenu { icon_id } => {
            if state.icon(*icon_id).is_none() {
                return Err(ReducerError::IconNotFound(*icon_id));
            }
            state.desktop_menu.hide();
            activation::deactivate_windows(state);
        }
        DesktopAction::MinimizeAll { app_id } => {
            application_mut(state, *app_id)?.minimize_all(&metrics, effects);
        }
        DesktopAction::RestoreAll { app_id } => {
            application_mut(state, *app_id)?.restore_all(&metrics, effects);
        }
        DesktopAction::CloseAll { app_id } => {
            application_mut(state, *app_id)?.close_all(effects);
        }
        DesktopAction::TaskbarIconClick { app_id, trigger } => {
            let app = application_mut(state, *app_id)?;
            if let Some(menu) = app.right_menu.as_mut() {
                menu.hide();
            }
            let open: Vec<_> = app.open_windows().map(|w| w.id()).collect();
            match open.as_slice() {
                [] => {}
                [only] => {
                    let only = *only;
                    let Some(window) = app.window_mut(only) else {
                        return Ok(true);
                    };
                    if window.minimized() {
                        if window_manager::request_restore(window, &metrics, effects) {
                            activation::activate_window(state, only)?;
                        }
                    } else if window.minimizing() {
                        window_manager::cancel_minimize(window, effects);
                    } else {
                        window_manager::request_minimize(window, &metrics, effects);
                    }
                }
                _ => {
                    let (x, y) = metrics.menu.anchored_under(*trigger);
                    if let Some(menu) = app.left_menu.as_mut() {
                        menu.show_at(x, y);
                    }
                }
            }
        }
        DesktopAction::TaskbarIconContextMenu { app_id, trigger } => {
            let app = application_mut(state, *app_id)?;
            if let Some(menu) = app.left_menu.as_mut() {
                menu.hide();
            }
            let (x, y) = metrics.menu.anchored_under(*trigger);
            if let Some(menu) = app.right_menu.as_mut() {
                menu.show_at(x, y);
            }
        }
        DesktopAction::WindowMenuItemClick { app_id, window_id } => {
            application_mut(state, *app_id)?.hide_menus();
            activation::activate_window(state, *window_id)?;
        }
        DesktopAction::DesktopClick => {
            state.desktop_menu.hide();
            hide_app_menus(state);
            activation::deactivate_all(state);
        }
        DesktopAction::DesktopContextMenu { pointer, viewport } => {
            hide_app_menus(state);
            activation::deactivate_windows(state);
            state.refresh_desktop_menu();
            let placed = metrics
                .menu
                .layout(state.desktop_menu.items(), pointer.x, pointer.y, *viewport);
            state.desktop_menu.show_at(placed.x, placed.y);
        }
        DesktopAction::TaskbarClick | DesktopAction::TaskbarContextMenu => {
            state.desktop_menu.hide();
            activation::deactivate_windows(state);
        }
        DesktopAction::SwitchTheme => {
            let mode = state.theme.switch();
            effects.push(RuntimeEffect::ApplyTheme(mode));
        }
        DesktopAction::SystemThemeChanged { prefers_dark } => {
            let mode = platform_host::ThemeMode::from_prefers_dark(*prefers_dark);
            if state.theme.set_system(mode) {
                effects.push(RuntimeEffect::ApplyTheme(state.active_theme()));
            }
        }
        DesktopAction::SortIcons => {
            desktop_icons::sort_icons(state);
            state.desktop_menu.hide();
        }
        DesktopAction::ToggleAlignToGrid => {
            state.align_to_grid = !state.align_to_grid;
            if state.align_to_grid {
                desktop_icons::snap_all(state);
            }
            state.desktop_menu.hide();
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn application_mut(
    state: &mut DesktopState,
    app_id: AppId,
) -> Result<&mut crate::application::Application, ReducerError> {
    state
        .application_mut(app_id)
        .ok_or(ReducerError::ApplicationNotFound(app_id))
}

fn hide_app_menus(state: &mut DesktopState) {
    for app in &mut state.applications {
        app.hide_menus();
    }
}

impl DesktopState {
    /// Recomputes the desktop context menu items. Returns `true` when they changed.
    pub(crate) fn refresh_desktop_menu(&mut self) -> bool {
        let items = menus::desktop_items(self.active_theme(), self.align_to_grid);
        self.desktop_menu.replace_items(items)
    }
}
