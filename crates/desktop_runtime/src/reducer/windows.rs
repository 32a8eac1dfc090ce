//! Reducer helpers for window lifecycle, resize, and drag actions.

use crate::{
    activation,
    model::{DesktopState, InteractionState},
    reducer::{find_window_mut, open_window, DesktopAction, ReducerError, RuntimeEffect},
    window_manager,
};

pub(super) fn reduce_window_action(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: &DesktopAction,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<bool, ReducerError> {
    let metrics = state.metrics;
    match action {
        DesktopAction::OpenWindow { app_id } => {
            let window_id = open_window(state, *app_id)?;
            let window = find_window_mut(state, window_id)?;
            if window.minimized() {
                window_manager::request_restore(window, &metrics, effects);
            }
        }
        DesktopAction::CloseWindow { window_id } => {
            window_manager::close(find_window_mut(state, *window_id)?, effects);
        }
        DesktopAction::ActivateWindow { window_id } => {
            activation::activate_window(state, *window_id)?;
        }
        DesktopAction::MinimizeWindow { window_id } => {
            window_manager::request_minimize(find_window_mut(state, *window_id)?, &metrics, effects);
        }
        DesktopAction::MaximizeWindow { window_id } => {
            window_manager::request_maximize(find_window_mut(state, *window_id)?, &metrics, effects);
        }
        DesktopAction::ToggleMaximizeWindow { window_id } => {
            window_manager::toggle_maximize(find_window_mut(state, *window_id)?, &metrics, effects);
        }
        DesktopAction::RestoreWindow { window_id } => {
            window_manager::request_restore(find_window_mut(state, *window_id)?, &metrics, effects);
        }
        DesktopAction::CompleteTransition {
            window_id,
            transition,
            generation,
        } => {
            // The window may already be gone; a late timer is not an error.
            if let Some(window) = state.window_mut(*window_id) {
                window_manager::complete_transition(window, *transition, *generation);
            }
        }
        DesktopAction::RetitleWindow { window_id, title } => {
            let window = find_window_mut(state, *window_id)?;
            if window.title != *title {
                window.title = title.clone();
            }
        }
        DesktopAction::BeginResize { window_id, pointer } => {
            find_window_mut(state, *window_id)?;
            if let Some(previous) = interaction.resizing.take() {
                if let Some(window) = state.window_mut(previous.window_id) {
                    window_manager::end_resize(window, &previous, None);
                }
                effects.push(RuntimeEffect::DetachResizeListeners(previous.window_id));
            }
            let session = window_manager::begin_resize(find_window_mut(state, *window_id)?, *pointer);
            if let Some(session) = session {
                interaction.resizing = Some(session);
                effects.push(RuntimeEffect::AttachResizeListeners(*window_id));
                activation::activate_window(state, *window_id)?;
            }
        }
        DesktopAction::UpdateResize { pointer, container } => {
            if let Some(session) = interaction.resizing.as_mut() {
                if let Some(window) = state.window_mut(session.window_id) {
                    window_manager::update_resize(window, session, *pointer, *container, &metrics);
                }
            }
        }
        DesktopAction::EndResize { measured } => {
            if let Some(session) = interaction.resizing.take() {
                if let Some(window) = state.window_mut(session.window_id) {
                    window_manager::end_resize(window, &session, *measured);
                }
                effects.push(RuntimeEffect::DetachResizeListeners(session.window_id));
            }
        }
        DesktopAction::BeginDrag { window_id } => {
            let window = find_window_mut(state, *window_id)?;
            if window.drag_disabled() {
                return Ok(true);
            }
            window_manager::begin_drag(window, effects);
            interaction.dragging = Some(*window_id);
            activation::activate_window(state, *window_id)?;
        }
        DesktopAction::EndDrag {
            window_id,
            client_rect,
            container_origin,
        } => {
            if interaction.dragging == Some(*window_id) {
                interaction.dragging = None;
            }
            window_manager::end_drag(
                find_window_mut(state, *window_id)?,
                *client_rect,
                *container_origin,
            );
        }
        _ => return Ok(false),
    }
    Ok(true)
}
