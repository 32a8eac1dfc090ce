//! Reducer actions, side-effect intents, and the settle pass for the desktop runtime.

mod shell;
mod windows;

use platform_host::ThemeMode;
use thiserror::Error;

use crate::{
    activation,
    model::{
        AppId, Bounds, DesktopState, IconId, InteractionState, MenuCommand, Point, Rect, Size,
        TransitionKind, WindowId,
    },
    window_manager,
};

/// Upper bound on settle rounds per action. Every rule only clears state, so two rounds suffice.
const MAX_SETTLE_ROUNDS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window for an application (or re-activate a single-instance one).
    OpenWindow {
        /// Application to open.
        app_id: AppId,
    },
    /// Close a window. Closed windows are removed in the same pass.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Make a window the single active window and raise it.
    ActivateWindow {
        /// Window to activate.
        window_id: WindowId,
    },
    /// Start the minimize animation.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Start the maximize animation.
    MaximizeWindow {
        /// Window to maximize.
        window_id: WindowId,
    },
    /// Title-bar maximize button.
    ToggleMaximizeWindow {
        /// Window whose button was pressed.
        window_id: WindowId,
    },
    /// Restore a minimized or maximized window.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// A transition timer fired.
    CompleteTransition {
        /// Window the timer was scheduled for.
        window_id: WindowId,
        /// Transition the timer settles.
        transition: TransitionKind,
        /// Generation token captured when the timer was scheduled.
        generation: u64,
    },
    /// Replace a window's title.
    RetitleWindow {
        /// Window to retitle.
        window_id: WindowId,
        /// New title.
        title: String,
    },
    /// Pointer down on the resize handle.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Pointer position at resize start.
        pointer: Point,
    },
    /// Pointer move during a resize.
    UpdateResize {
        /// Current pointer position.
        pointer: Point,
        /// Drag container bounds, when the view could measure them.
        container: Option<Bounds>,
    },
    /// Pointer up after a resize.
    EndResize {
        /// Size the view measured after layout, if any.
        measured: Option<Size>,
    },
    /// Drag started on a window's title bar.
    BeginDrag {
        /// Window being dragged.
        window_id: WindowId,
    },
    /// Drag ended.
    EndDrag {
        /// Window that was dragged.
        window_id: WindowId,
        /// Dropped window rectangle in client coordinates.
        client_rect: Rect,
        /// Drag container origin in client coordinates.
        container_origin: Point,
    },
    /// Click on a desktop icon.
    ActivateIcon {
        /// Icon to activate.
        icon_id: IconId,
    },
    /// Drop after dragging a desktop icon.
    EndIconDrag {
        /// Icon that was dragged.
        icon_id: IconId,
        /// Dropped position in client coordinates.
        client_position: Point,
        /// Icon parent origin in client coordinates.
        parent_origin: Point,
    },
    /// Double-click on a desktop icon.
    OpenIcon {
        /// Icon to open.
        icon_id: IconId,
    },
    /// Right-click on a desktop icon.
    IconContextMenu {
        /// Icon under the pointer.
        icon_id: IconId,
    },
    /// Minimize every window of an application.
    MinimizeAll {
        /// Target application.
        app_id: AppId,
    },
    /// Restore every window of an application.
    RestoreAll {
        /// Target application.
        app_id: AppId,
    },
    /// Close every window of an application.
    CloseAll {
        /// Target application.
        app_id: AppId,
    },
    /// Left click on an application's taskbar icon.
    TaskbarIconClick {
        /// Application owning the taskbar icon.
        app_id: AppId,
        /// Taskbar icon rectangle, used to anchor the window list.
        trigger: Rect,
    },
    /// Right click on an application's taskbar icon.
    TaskbarIconContextMenu {
        /// Application owning the taskbar icon.
        app_id: AppId,
        /// Taskbar icon rectangle, used to anchor the bulk-action menu.
        trigger: Rect,
    },
    /// Entry picked from an application's window-list menu.
    WindowMenuItemClick {
        /// Application owning the menu.
        app_id: AppId,
        /// Window the entry stands for.
        window_id: WindowId,
    },
    /// Run a menu item's command.
    InvokeMenuCommand {
        /// Command attached to the picked item.
        command: MenuCommand,
    },
    /// Click on the bare desktop.
    DesktopClick,
    /// Right click on the bare desktop.
    DesktopContextMenu {
        /// Pointer position in desktop coordinates.
        pointer: Point,
        /// Desktop viewport the menu must stay within.
        viewport: Bounds,
    },
    /// Click on the taskbar background.
    TaskbarClick,
    /// Right click on the taskbar background.
    TaskbarContextMenu,
    /// Flip between light and dark, leaving system-follow mode.
    SwitchTheme,
    /// The host's color-scheme preference changed.
    SystemThemeChanged {
        /// Whether the system now prefers dark.
        prefers_dark: bool,
    },
    /// Lay icons out on the grid in label order.
    SortIcons,
    /// Toggle snapping icons to the grid.
    ToggleAlignToGrid,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell runtime to execute.
pub enum RuntimeEffect {
    /// Fire [`DesktopAction::CompleteTransition`] after `delay_ms`.
    ScheduleTransition {
        /// Window the timer belongs to.
        window_id: WindowId,
        /// Transition to complete.
        transition: TransitionKind,
        /// Token the completion must echo back.
        generation: u64,
        /// Delay before firing.
        delay_ms: u64,
    },
    /// Drop the window's pending transition timer, if any.
    CancelTransition {
        /// Window whose timer is cancelled.
        window_id: WindowId,
    },
    /// Start routing document pointer moves to the resize session.
    AttachResizeListeners(WindowId),
    /// Stop routing document pointer moves to the resize session.
    DetachResizeListeners(WindowId),
    /// Apply the active color scheme to the document.
    ApplyTheme(ThemeMode),
    /// A closed window left the state; release anything keyed by it.
    WindowRemoved(WindowId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that reference entities the desktop does not have.
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window {0:?} not found")]
    WindowNotFound(WindowId),
    /// The target desktop icon id was not found in the current state.
    #[error("desktop icon {0:?} not found")]
    IconNotFound(IconId),
    /// No application with this id is registered.
    #[error("application `{0}` not registered")]
    ApplicationNotFound(AppId),
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// After the action, the settle pass runs to a fixed point: per-window lifecycle rules, resize
/// session scope, removal of closed windows, and derived menu refresh.
///
/// # Errors
///
/// Returns a [`ReducerError`] when the action references a window, icon, or application that was
/// never created. Lookups happen before any mutation, so a failed action leaves state untouched.
/// Windows that were created and later closed are not errors: actions naming them do nothing.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    let result = apply_action(state, interaction, action, &mut effects);
    settle(state, interaction, &mut effects);
    result.map(|()| effects)
}

impl DesktopAction {
    /// The existing window this action operates on, if it names one.
    pub fn target_window(&self) -> Option<WindowId> {
        match self {
            Self::CloseWindow { window_id }
            | Self::ActivateWindow { window_id }
            | Self::MinimizeWindow { window_id }
            | Self::MaximizeWindow { window_id }
            | Self::ToggleMaximizeWindow { window_id }
            | Self::RestoreWindow { window_id }
            | Self::CompleteTransition { window_id, .. }
            | Self::RetitleWindow { window_id, .. }
            | Self::BeginResize { window_id, .. }
            | Self::BeginDrag { window_id }
            | Self::EndDrag { window_id, .. }
            | Self::WindowMenuItemClick { window_id, .. } => Some(*window_id),
            Self::InvokeMenuCommand {
                command: MenuCommand::ActivateWindow { window_id, .. },
            } => Some(*window_id),
            _ => None,
        }
    }
}

fn apply_action(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    // Closed windows are gone for good; acting on one is a no-op.
    if action
        .target_window()
        .is_some_and(|window_id| state.is_retired_window(window_id))
    {
        return Ok(());
    }
    if windows::reduce_window_action(state, interaction, &action, effects)? {
        return Ok(());
    }
    if let DesktopAction::InvokeMenuCommand { command } = action {
        return apply_action(state, interaction, command_action(command), effects);
    }
    shell::reduce_shell_action(state, interaction, &action, effects)?;
    Ok(())
}

fn command_action(command: MenuCommand) -> DesktopAction {
    match command {
        MenuCommand::ActivateWindow { app_id, window_id } => {
            DesktopAction::WindowMenuItemClick { app_id, window_id }
        }
        MenuCommand::MinimizeAll(app_id) => DesktopAction::MinimizeAll { app_id },
        MenuCommand::RestoreAll(app_id) => DesktopAction::RestoreAll { app_id },
        MenuCommand::CloseAll(app_id) => DesktopAction::CloseAll { app_id },
        MenuCommand::SwitchTheme => DesktopAction::SwitchTheme,
        MenuCommand::SortIcons => DesktopAction::SortIcons,
        MenuCommand::ToggleAlignToGrid => DesktopAction::ToggleAlignToGrid,
    }
}

/// Opens a window for `app_id` and activates it.
///
/// Single-instance applications hand back their existing window instead of allocating.
pub(crate) fn open_window(state: &mut DesktopState, app_id: AppId) -> Result<WindowId, ReducerError> {
    let metrics = state.metrics;
    let reusable = state
        .application(app_id)
        .ok_or(ReducerError::ApplicationNotFound(app_id))?
        .reusable_window();
    if let Some(existing) = reusable {
        activation::activate_window(state, existing)?;
        return Ok(existing);
    }

    let window_id = state.next_window_id();
    let created_at = state.next_activation_stamp();
    state
        .application_mut(app_id)
        .ok_or(ReducerError::ApplicationNotFound(app_id))?
        .create_window(window_id, created_at, &metrics);
    activation::activate_window(state, window_id)?;
    Ok(window_id)
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut crate::model::WindowState, ReducerError> {
    state
        .window_mut(window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}

fn settle(state: &mut DesktopState, interaction: &mut InteractionState, effects: &mut Vec<RuntimeEffect>) {
    for _ in 0..MAX_SETTLE_ROUNDS {
        let mut changed = false;

        for window in state
            .applications
            .iter_mut()
            .flat_map(|app| app.windows.iter_mut())
        {
            changed |= window_manager::settle_window(window);
        }
        changed |= enforce_resize_scope(state, interaction, effects);
        changed |= enforce_drag_scope(state, interaction);

        let mut removed = Vec::new();
        for app in &mut state.applications {
            removed.extend(app.prune_closed());
        }
        if !removed.is_empty() {
            changed = true;
            activation::restack_windows(state);
            effects.extend(removed.into_iter().map(RuntimeEffect::WindowRemoved));
        }

        let theme = state.active_theme();
        for app in &mut state.applications {
            changed |= app.refresh_menus(theme);
        }
        changed |= state.refresh_desktop_menu();

        if !changed {
            break;
        }
    }
}

/// The resize session lives exactly as long as its window's `resizing` flag.
fn enforce_resize_scope(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    effects: &mut Vec<RuntimeEffect>,
) -> bool {
    let session_window = interaction.resizing.map(|session| session.window_id);
    let mut changed = false;

    if let Some(window_id) = session_window {
        let still_resizing = state.window(window_id).is_some_and(|w| w.resizing);
        if !still_resizing {
            interaction.resizing = None;
            effects.push(RuntimeEffect::DetachResizeListeners(window_id));
            changed = true;
        }
    }

    let owner = interaction.resizing.map(|session| session.window_id);
    for window in state
        .applications
        .iter_mut()
        .flat_map(|app| app.windows.iter_mut())
    {
        if window.resizing && Some(window.id) != owner {
            window.resizing = false;
            changed = true;
        }
    }
    changed
}

fn enforce_drag_scope(state: &DesktopState, interaction: &mut InteractionState) -> bool {
    let Some(window_id) = interaction.dragging else {
        return false;
    };
    let draggable = state.window(window_id).is_some_and(|w| !w.drag_disabled());
    if !draggable {
        interaction.dragging = None;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{apps::test_catalog, model::WindowPhase};

    fn desktop() -> (DesktopState, InteractionState) {
        (
            DesktopState::from_catalog(Default::default(), &test_catalog()),
            InteractionState::default(),
        )
    }

    fn open(state: &mut DesktopState, interaction: &mut InteractionState, app_id: AppId) -> WindowId {
        reduce_desktop(state, interaction, DesktopAction::OpenWindow { app_id }).expect("open");
        state.active_window_id().expect("opened window is active")
    }

    fn scheduled(effects: &[RuntimeEffect]) -> Vec<(WindowId, TransitionKind, u64)> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                RuntimeEffect::ScheduleTransition {
                    window_id,
                    transition,
                    generation,
                    ..
                } => Some((*window_id, *transition, *generation)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn open_window_activates_and_fills_window_menu() {
        let (mut state, mut interaction) = desktop();
        let first = open(&mut state, &mut interaction, AppId::Explorer);
        let second = open(&mut state, &mut interaction, AppId::Explorer);

        assert_ne!(first, second);
        assert_eq!(state.active_window_id(), Some(second));
        let menu = state
            .application(AppId::Explorer)
            .and_then(|app| app.left_menu())
            .expect("left menu");
        let targets: Vec<_> = menu.items().iter().filter_map(|item| item.command).collect();
        assert_eq!(
            targets,
            vec![
                MenuCommand::ActivateWindow {
                    app_id: AppId::Explorer,
                    window_id: first,
                },
                MenuCommand::ActivateWindow {
                    app_id: AppId::Explorer,
                    window_id: second,
                },
            ]
        );
    }

    #[test]
    fn single_instance_reactivates_existing_window() {
        let (mut state, mut interaction) = desktop();
        let blog = open(&mut state, &mut interaction, AppId::Blog);
        open(&mut state, &mut interaction, AppId::Explorer);

        let again = open(&mut state, &mut interaction, AppId::Blog);

        assert_eq!(again, blog);
        assert_eq!(state.application(AppId::Blog).map(|a| a.windows().len()), Some(1));
    }

    #[test]
    fn close_removes_window_and_reports_it() {
        let (mut state, mut interaction) = desktop();
        let first = open(&mut state, &mut interaction, AppId::Explorer);
        let second = open(&mut state, &mut interaction, AppId::Explorer);

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: second },
        )
        .expect("close");

        assert_eq!(effects, vec![RuntimeEffect::WindowRemoved(second)]);
        assert!(state.window(second).is_none());
        assert_eq!(state.window(first).map(|w| w.z_index()), Some(1000));
        assert_eq!(state.active_window_id(), None);
    }

    #[test]
    fn unknown_ids_surface_as_errors() {
        let (mut state, mut interaction) = desktop();
        assert_eq!(
            reduce_desktop(
                &mut state,
                &mut interaction,
                DesktopAction::MinimizeWindow {
                    window_id: WindowId(77)
                },
            ),
            Err(ReducerError::WindowNotFound(WindowId(77)))
        );
        assert_eq!(
            reduce_desktop(
                &mut state,
                &mut interaction,
                DesktopAction::OpenIcon { icon_id: IconId(77) },
            ),
            Err(ReducerError::IconNotFound(IconId(77)))
        );

        let mut bare = DesktopState::default();
        assert_eq!(
            reduce_desktop(
                &mut bare,
                &mut interaction,
                DesktopAction::OpenWindow {
                    app_id: AppId::Blog
                },
            ),
            Err(ReducerError::ApplicationNotFound(AppId::Blog))
        );
    }

    #[test]
    fn late_timer_for_removed_window_is_ignored() {
        let (mut state, mut interaction) = desktop();
        let window_id = open(&mut state, &mut interaction, AppId::Explorer);
        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id },
        )
        .expect("minimize");
        let (_, transition, generation) = scheduled(&effects)[0];
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id },
        )
        .expect("close");

        let late = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CompleteTransition {
                window_id,
                transition,
                generation,
            },
        )
        .expect("stale timer is not an error");

        assert!(late.is_empty());
        assert!(state.window(window_id).is_none());
    }

    #[test]
    fn actions_on_closed_window_do_nothing() {
        let (mut state, mut interaction) = desktop();
        let window_id = open(&mut state, &mut interaction, AppId::Explorer);
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id },
        )
        .expect("close");
        let before = state.clone();

        for action in [
            DesktopAction::CloseWindow { window_id },
            DesktopAction::MinimizeWindow { window_id },
            DesktopAction::RestoreWindow { window_id },
            DesktopAction::ActivateWindow { window_id },
            DesktopAction::BeginDrag { window_id },
            DesktopAction::EndDrag {
                window_id,
                client_rect: Rect::new(0.0, 0.0, 300.0, 200.0),
                container_origin: Point::default(),
            },
        ] {
            let effects = reduce_desktop(&mut state, &mut interaction, action).expect("no-op");
            assert!(effects.is_empty());
        }

        assert!(state.is_retired_window(window_id));
        assert!(!state.is_retired_window(WindowId(99)));
        assert_eq!(state, before);
    }

    #[test]
    fn failed_resize_start_keeps_running_session() {
        let (mut state, mut interaction) = desktop();
        let window_id = open(&mut state, &mut interaction, AppId::Explorer);
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::BeginResize {
                window_id,
                pointer: Point::new(850.0, 650.0),
            },
        )
        .expect("begin resize");

        let result = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::BeginResize {
                window_id: WindowId(999),
                pointer: Point::new(10.0, 10.0),
            },
        );

        assert_eq!(result, Err(ReducerError::WindowNotFound(WindowId(999))));
        assert_eq!(interaction.resizing.map(|s| s.window_id), Some(window_id));
        assert_eq!(state.window(window_id).map(|w| w.resizing()), Some(true));
    }

    #[test]
    fn resize_session_is_scoped_to_the_resizing_flag() {
        let (mut state, mut interaction) = desktop();
        let window_id = open(&mut state, &mut interaction, AppId::Explorer);

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::BeginResize {
                window_id,
                pointer: Point::new(850.0, 650.0),
            },
        )
        .expect("begin resize");
        assert_eq!(effects, vec![RuntimeEffect::AttachResizeListeners(window_id)]);
        assert_eq!(state.window(window_id).map(|w| w.phase()), Some(WindowPhase::Resizing));

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id },
        )
        .expect("minimize");

        assert!(interaction.resizing.is_none());
        assert!(effects.contains(&RuntimeEffect::DetachResizeListeners(window_id)));
        assert_eq!(scheduled(&effects).len(), 1);
    }

    #[test]
    fn resize_round_trip_commits_measured_size() {
        let (mut state, mut interaction) = desktop();
        let window_id = open(&mut state, &mut interaction, AppId::Explorer);

        for action in [
            DesktopAction::BeginResize {
                window_id,
                pointer: Point::new(850.0, 650.0),
            },
            DesktopAction::UpdateResize {
                pointer: Point::new(800.0, 600.0),
                container: None,
            },
        ] {
            reduce_desktop(&mut state, &mut interaction, action).expect("resize");
        }
        assert_eq!(
            state.window(window_id).map(|w| w.rect().current),
            Some(Rect::new(50.0, 50.0, 750.0, 550.0))
        );

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::EndResize {
                measured: Some(Size {
                    width: 748.0,
                    height: 551.0,
                }),
            },
        )
        .expect("end resize");

        assert_eq!(effects, vec![RuntimeEffect::DetachResizeListeners(window_id)]);
        let rect = state.window(window_id).map(|w| w.rect()).expect("window");
        assert_eq!(rect.current, Rect::new(50.0, 50.0, 748.0, 551.0));
        assert_eq!(rect.previous, Some(Rect::new(50.0, 50.0, 800.0, 600.0)));
        assert!(interaction.resizing.is_none());
    }

    #[test]
    fn menu_commands_route_to_actions() {
        let (mut state, mut interaction) = desktop();
        let first = open(&mut state, &mut interaction, AppId::Explorer);
        open(&mut state, &mut interaction, AppId::Explorer);

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::InvokeMenuCommand {
                command: MenuCommand::ActivateWindow {
                    app_id: AppId::Explorer,
                    window_id: first,
                },
            },
        )
        .expect("menu command");
        assert_eq!(state.active_window_id(), Some(first));

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::InvokeMenuCommand {
                command: MenuCommand::CloseAll(AppId::Explorer),
            },
        )
        .expect("close all");
        assert_eq!(state.windows().count(), 0);
        assert!(state
            .application(AppId::Explorer)
            .and_then(|app| app.left_menu())
            .map(|menu| menu.items().is_empty())
            .unwrap_or(false));
    }
}
