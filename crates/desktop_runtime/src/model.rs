use platform_host::{ThemeMode, ThemePreference};
use serde::{Deserialize, Serialize};

use crate::{application::Application, config::ShellMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IconId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppId {
    Blog,
    Explorer,
}

impl AppId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Explorer => "explorer",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "blog" => Some(Self::Blog),
            "explorer" => Some(Self::Explorer),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned rectangle in container-relative, device-independent units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..self
        }
    }
}

/// Edges of a bounding region (desktop viewport or drag container).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self {
            left: rect.left,
            top: rect.top,
            right: rect.right(),
            bottom: rect.bottom(),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Current window geometry plus the geometry to return to on restore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowRectState {
    pub current: Rect,
    pub previous: Option<Rect>,
}

impl WindowRectState {
    pub const fn new(current: Rect) -> Self {
        Self {
            current,
            previous: None,
        }
    }
}

/// Delayed lifecycle transitions resolved by a host timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    Minimize,
    Maximize,
    RestoreUp,
    RestoreDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransition {
    pub kind: TransitionKind,
    pub generation: u64,
}

/// Lifecycle phase derived from a window's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowPhase {
    Normal,
    Minimizing,
    Minimized,
    RestoringUp,
    Maximizing,
    Maximized,
    RestoringDown,
    Resizing,
    Closed,
}

/// Per-window state record.
///
/// Fields are crate-private: the rendering layer reads through accessors and mutates only by
/// dispatching [`crate::DesktopAction`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowState {
    pub(crate) id: WindowId,
    pub(crate) app_id: AppId,
    pub(crate) title: String,
    pub(crate) icon: String,
    pub(crate) rect: WindowRectState,
    pub(crate) minimized: bool,
    pub(crate) maximized: bool,
    pub(crate) active: bool,
    pub(crate) minimizing: bool,
    pub(crate) maximizing: bool,
    pub(crate) restoring_up: bool,
    pub(crate) restoring_down: bool,
    pub(crate) resizing: bool,
    pub(crate) closed: bool,
    pub(crate) last_activated: u64,
    pub(crate) z_index: u32,
    pub(crate) transition_generation: u64,
    pub(crate) pending_transition: Option<PendingTransition>,
}

impl WindowState {
    pub(crate) fn new(
        id: WindowId,
        app_id: AppId,
        title: impl Into<String>,
        icon: impl Into<String>,
        rect: Rect,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            app_id,
            title: title.into(),
            icon: icon.into(),
            rect: WindowRectState::new(rect),
            minimized: false,
            maximized: false,
            active: false,
            minimizing: false,
            maximizing: false,
            restoring_up: false,
            restoring_down: false,
            resizing: false,
            closed: false,
            last_activated: created_at,
            z_index: 0,
            transition_generation: 0,
            pending_transition: None,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn app_id(&self) -> AppId {
        self.app_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn rect(&self) -> WindowRectState {
        self.rect
    }

    pub fn minimized(&self) -> bool {
        self.minimized
    }

    pub fn maximized(&self) -> bool {
        self.maximized
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn minimizing(&self) -> bool {
        self.minimizing
    }

    pub fn maximizing(&self) -> bool {
        self.maximizing
    }

    pub fn restoring_up(&self) -> bool {
        self.restoring_up
    }

    pub fn restoring_down(&self) -> bool {
        self.restoring_down
    }

    pub fn resizing(&self) -> bool {
        self.resizing
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn last_activated(&self) -> u64 {
        self.last_activated
    }

    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    pub fn pending_transition(&self) -> Option<PendingTransition> {
        self.pending_transition
    }

    /// Dragging is disabled while the window is minimized; a maximized window unmaximizes on
    /// drag-start instead.
    pub fn drag_disabled(&self) -> bool {
        self.minimized || self.closed
    }

    /// True while any of the four delayed transitions is in flight.
    pub fn in_transition(&self) -> bool {
        self.minimizing || self.maximizing || self.restoring_up || self.restoring_down
    }

    pub fn phase(&self) -> WindowPhase {
        if self.closed {
            WindowPhase::Closed
        } else if self.minimizing {
            WindowPhase::Minimizing
        } else if self.restoring_up {
            WindowPhase::RestoringUp
        } else if self.minimized {
            WindowPhase::Minimized
        } else if self.maximizing {
            WindowPhase::Maximizing
        } else if self.restoring_down {
            WindowPhase::RestoringDown
        } else if self.maximized {
            WindowPhase::Maximized
        } else if self.resizing {
            WindowPhase::Resizing
        } else {
            WindowPhase::Normal
        }
    }
}

/// Per-icon state record. Icons compete for activation only with other icons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopIconState {
    pub(crate) id: IconId,
    pub(crate) app_id: AppId,
    pub(crate) icon: String,
    pub(crate) label: String,
    pub(crate) position: Point,
    pub(crate) active: bool,
    pub(crate) last_activated: u64,
    pub(crate) z_index: u32,
}

impl DesktopIconState {
    pub(crate) fn new(
        id: IconId,
        app_id: AppId,
        icon: impl Into<String>,
        label: impl Into<String>,
        position: Point,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            app_id,
            icon: icon.into(),
            label: label.into(),
            position,
            active: false,
            last_activated: created_at,
            z_index: 0,
        }
    }

    pub fn id(&self) -> IconId {
        self.id
    }

    pub fn app_id(&self) -> AppId {
        self.app_id
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn last_activated(&self) -> u64 {
        self.last_activated
    }

    pub fn z_index(&self) -> u32 {
        self.z_index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MenuAnchor {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// What a menu item does when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuCommand {
    ActivateWindow { app_id: AppId, window_id: WindowId },
    MinimizeAll(AppId),
    RestoreAll(AppId),
    CloseAll(AppId),
    SwitchTheme,
    SortIcons,
    ToggleAlignToGrid,
}

/// Declarative menu entry. Lists are recomputed from state, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MenuItem {
    pub label: Option<String>,
    pub icon: Option<String>,
    pub command: Option<MenuCommand>,
    pub disabled: bool,
    pub divider: bool,
    pub shortcut: Option<String>,
    pub checked: Option<bool>,
}

impl MenuItem {
    pub fn action(label: impl Into<String>, icon: impl Into<String>, command: MenuCommand) -> Self {
        Self {
            label: Some(label.into()),
            icon: Some(icon.into()),
            command: Some(command),
            ..Self::default()
        }
    }

    pub fn divider() -> Self {
        Self {
            divider: true,
            ..Self::default()
        }
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuModel {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) visible: bool,
    pub(crate) items: Vec<MenuItem>,
    pub(crate) anchor: MenuAnchor,
}

impl MenuModel {
    pub fn new(anchor: MenuAnchor) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            visible: false,
            items: Vec::new(),
            anchor,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn anchor(&self) -> MenuAnchor {
        self.anchor
    }

    pub(crate) fn show_at(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }

    /// Replaces the item list when it differs. Returns `true` when replaced.
    pub(crate) fn replace_items(&mut self, items: Vec<MenuItem>) -> bool {
        if self.items == items {
            return false;
        }
        self.items = items;
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub(crate) next_window_id: u64,
    pub(crate) next_icon_id: u64,
    pub(crate) activation_clock: u64,
    pub(crate) applications: Vec<Application>,
    pub(crate) desktop_menu: MenuModel,
    pub(crate) theme: ThemePreference,
    pub(crate) align_to_grid: bool,
    pub(crate) metrics: ShellMetrics,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::new(ShellMetrics::default())
    }
}

impl DesktopState {
    /// Creates an empty desktop with no applications registered.
    pub fn new(metrics: ShellMetrics) -> Self {
        Self {
            next_window_id: 1,
            next_icon_id: 1,
            activation_clock: 0,
            applications: Vec::new(),
            desktop_menu: MenuModel::new(MenuAnchor::TopLeft),
            theme: ThemePreference::default(),
            align_to_grid: false,
            metrics,
        }
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn application(&self, app_id: AppId) -> Option<&Application> {
        self.applications.iter().find(|app| app.id() == app_id)
    }

    pub fn windows(&self) -> impl Iterator<Item = &WindowState> {
        self.applications.iter().flat_map(|app| app.windows().iter())
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowState> {
        self.windows().find(|w| w.id == window_id)
    }

    pub fn icons(&self) -> impl Iterator<Item = &DesktopIconState> {
        self.applications
            .iter()
            .flat_map(|app| app.desktop_icons().iter())
    }

    pub fn icon(&self, icon_id: IconId) -> Option<&DesktopIconState> {
        self.icons().find(|icon| icon.id == icon_id)
    }

    pub fn active_window_id(&self) -> Option<WindowId> {
        self.windows().find(|w| w.active).map(|w| w.id)
    }

    pub fn active_icon_id(&self) -> Option<IconId> {
        self.icons().find(|icon| icon.active).map(|icon| icon.id)
    }

    pub fn desktop_menu(&self) -> &MenuModel {
        &self.desktop_menu
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn active_theme(&self) -> ThemeMode {
        self.theme.active()
    }

    pub fn align_to_grid(&self) -> bool {
        self.align_to_grid
    }

    pub fn metrics(&self) -> &ShellMetrics {
        &self.metrics
    }

    pub(crate) fn application_mut(&mut self, app_id: AppId) -> Option<&mut Application> {
        self.applications.iter_mut().find(|app| app.id() == app_id)
    }

    pub(crate) fn window_mut(&mut self, window_id: WindowId) -> Option<&mut WindowState> {
        self.applications
            .iter_mut()
            .flat_map(|app| app.windows.iter_mut())
            .find(|w| w.id == window_id)
    }

    pub(crate) fn icon_mut(&mut self, icon_id: IconId) -> Option<&mut DesktopIconState> {
        self.applications
            .iter_mut()
            .flat_map(|app| app.desktop_icons.iter_mut())
            .find(|icon| icon.id == icon_id)
    }

    pub(crate) fn next_window_id(&mut self) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id = self.next_window_id.saturating_add(1);
        id
    }

    /// True for ids this desktop handed out whose window has since been closed and removed.
    pub fn is_retired_window(&self, window_id: WindowId) -> bool {
        (1..self.next_window_id).contains(&window_id.0) && self.window(window_id).is_none()
    }

    pub(crate) fn next_icon_id(&mut self) -> IconId {
        let id = IconId(self.next_icon_id);
        self.next_icon_id = self.next_icon_id.saturating_add(1);
        id
    }

    /// Strictly increasing stamp used for creation and activation recency.
    pub(crate) fn next_activation_stamp(&mut self) -> u64 {
        self.activation_clock = self.activation_clock.saturating_add(1);
        self.activation_clock
    }
}

/// Pointer capture for an in-progress resize. Exists exactly while the window's `resizing` flag
/// is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub pointer_start: Point,
    pub start_width: f64,
    pub start_height: f64,
    pub rect_start: Rect,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub resizing: Option<ResizeSession>,
    pub dragging: Option<WindowId>,
}
