//! Application container: owns one program's windows, desktop icons, and taskbar menus.

use platform_host::ThemeMode;
use serde::{Deserialize, Serialize};

use crate::{
    config::ShellMetrics,
    menus,
    model::{AppId, DesktopIconState, MenuAnchor, MenuModel, Rect, WindowId, WindowState},
    reducer::RuntimeEffect,
    window_manager,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
/// How an application answers an open request.
pub enum OpenBehavior {
    /// Every open request allocates a new window.
    #[default]
    Multi,
    /// At most one window; further open requests re-activate it.
    SingleInstance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub(crate) id: AppId,
    pub(crate) title: String,
    pub(crate) icon: String,
    pub(crate) open_behavior: OpenBehavior,
    pub(crate) windows: Vec<WindowState>,
    pub(crate) desktop_icons: Vec<DesktopIconState>,
    pub(crate) left_menu: Option<MenuModel>,
    pub(crate) right_menu: Option<MenuModel>,
}

impl Application {
    /// Creates an application with both taskbar menus anchored bottom-left.
    pub fn new(
        id: AppId,
        title: impl Into<String>,
        icon: impl Into<String>,
        open_behavior: OpenBehavior,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            icon: icon.into(),
            open_behavior,
            windows: Vec::new(),
            desktop_icons: Vec::new(),
            left_menu: Some(MenuModel::new(MenuAnchor::BottomLeft)),
            right_menu: Some(MenuModel::new(MenuAnchor::BottomLeft)),
        }
    }

    pub fn id(&self) -> AppId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn open_behavior(&self) -> OpenBehavior {
        self.open_behavior
    }

    /// Owned windows in creation order. Stacking order comes from z-index, not position.
    pub fn windows(&self) -> &[WindowState] {
        &self.windows
    }

    pub fn desktop_icons(&self) -> &[DesktopIconState] {
        &self.desktop_icons
    }

    pub fn left_menu(&self) -> Option<&MenuModel> {
        self.left_menu.as_ref()
    }

    pub fn right_menu(&self) -> Option<&MenuModel> {
        self.right_menu.as_ref()
    }

    pub fn active_window(&self) -> Option<&WindowState> {
        self.windows.iter().find(|w| w.active)
    }

    pub(crate) fn open_windows(&self) -> impl Iterator<Item = &WindowState> {
        self.windows.iter().filter(|w| !w.closed)
    }

    pub(crate) fn window_mut(&mut self, window_id: WindowId) -> Option<&mut WindowState> {
        self.windows.iter_mut().find(|w| w.id == window_id)
    }

    /// The window an open request should reuse instead of allocating, if any.
    pub(crate) fn reusable_window(&self) -> Option<WindowId> {
        match self.open_behavior {
            OpenBehavior::Multi => None,
            OpenBehavior::SingleInstance => self.open_windows().next().map(|w| w.id),
        }
    }

    /// Appends a window seeded with this application's title and icon.
    ///
    /// Each already-open window shifts the new one down and right by the cascade step.
    pub(crate) fn create_window(
        &mut self,
        id: WindowId,
        created_at: u64,
        metrics: &ShellMetrics,
    ) -> WindowId {
        let cascade = (self.open_windows().count() % 8) as f64 * metrics.cascade_step;
        let rect: Rect = metrics.default_window_rect.offset(cascade, cascade);
        self.windows.push(WindowState::new(
            id,
            self.id,
            self.title.clone(),
            self.icon.clone(),
            rect,
            created_at,
        ));
        id
    }

    pub(crate) fn hide_menus(&mut self) {
        for menu in [self.left_menu.as_mut(), self.right_menu.as_mut()]
            .into_iter()
            .flatten()
        {
            menu.hide();
        }
    }

    pub(crate) fn minimize_all(&mut self, metrics: &ShellMetrics, effects: &mut Vec<RuntimeEffect>) {
        for window in &mut self.windows {
            window_manager::request_minimize(window, metrics, effects);
        }
        self.hide_menus();
    }

    pub(crate) fn restore_all(&mut self, metrics: &ShellMetrics, effects: &mut Vec<RuntimeEffect>) {
        for window in &mut self.windows {
            window_manager::request_restore(window, metrics, effects);
        }
        self.hide_menus();
    }

    pub(crate) fn close_all(&mut self, effects: &mut Vec<RuntimeEffect>) {
        for window in &mut self.windows {
            window_manager::close(window, effects);
        }
        self.hide_menus();
    }

    /// Drops closed windows. Returns the ids removed; empty when nothing changed.
    pub(crate) fn prune_closed(&mut self) -> Vec<WindowId> {
        if !self.windows.iter().any(|w| w.closed) {
            return Vec::new();
        }
        let mut removed = Vec::new();
        self.windows.retain(|w| {
            if w.closed {
                removed.push(w.id);
            }
            !w.closed
        });
        removed
    }

    /// Recomputes both taskbar menus from the window list and theme.
    pub(crate) fn refresh_menus(&mut self, theme: ThemeMode) -> bool {
        let window_items = menus::window_list_items(self);
        let bulk_items = menus::bulk_action_items(self.id, theme);
        let mut changed = false;
        if let Some(menu) = self.left_menu.as_mut() {
            changed |= menu.replace_items(window_items);
        }
        if let Some(menu) = self.right_menu.as_mut() {
            changed |= menu.replace_items(bulk_items);
        }
        changed
    }
}
