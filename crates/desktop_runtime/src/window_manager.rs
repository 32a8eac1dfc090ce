//! Window lifecycle transitions used by the desktop reducer.
//!
//! Every helper takes the window record plus the effect sink and returns `true` when it changed
//! anything. Delayed transitions are scheduled through [`RuntimeEffect::ScheduleTransition`]
//! carrying a generation token; [`complete_transition`] ignores deliveries whose token no longer
//! matches.

use crate::{
    config::ShellMetrics,
    model::{
        Bounds, PendingTransition, Point, Rect, ResizeSession, Size, TransitionKind,
        WindowRectState, WindowState,
    },
    reducer::RuntimeEffect,
};

/// Upper bound on settle iterations for a single window. The rules converge in two passes.
const MAX_SETTLE_PASSES: usize = 4;

/// Commits a new rect when it differs structurally from the current one.
pub fn commit_rect(window: &mut WindowState, rect: WindowRectState) -> bool {
    if window.rect == rect {
        return false;
    }
    window.rect = rect;
    true
}

fn schedule(
    window: &mut WindowState,
    kind: TransitionKind,
    metrics: &ShellMetrics,
    effects: &mut Vec<RuntimeEffect>,
) {
    if window.pending_transition.is_some() {
        effects.push(RuntimeEffect::CancelTransition {
            window_id: window.id,
        });
    }
    window.transition_generation = window.transition_generation.saturating_add(1);
    window.pending_transition = Some(PendingTransition {
        kind,
        generation: window.transition_generation,
    });
    effects.push(RuntimeEffect::ScheduleTransition {
        window_id: window.id,
        transition: kind,
        generation: window.transition_generation,
        delay_ms: metrics.transition_delay_ms,
    });
}

fn cancel_pending(window: &mut WindowState, effects: &mut Vec<RuntimeEffect>) {
    if window.pending_transition.take().is_some() {
        window.transition_generation = window.transition_generation.saturating_add(1);
        effects.push(RuntimeEffect::CancelTransition {
            window_id: window.id,
        });
    }
}

/// Normal -> Minimizing.
pub fn request_minimize(
    window: &mut WindowState,
    metrics: &ShellMetrics,
    effects: &mut Vec<RuntimeEffect>,
) -> bool {
    if window.closed || window.minimized || window.maximized || window.in_transition() {
        return false;
    }
    window.resizing = false;
    window.minimizing = true;
    schedule(window, TransitionKind::Minimize, metrics, effects);
    true
}

/// Normal -> Maximizing.
pub fn request_maximize(
    window: &mut WindowState,
    metrics: &ShellMetrics,
    effects: &mut Vec<RuntimeEffect>,
) -> bool {
    if window.closed || window.minimized || window.maximized || window.in_transition() {
        return false;
    }
    window.resizing = false;
    window.maximizing = true;
    schedule(window, TransitionKind::Maximize, metrics, effects);
    true
}

/// Maximized -> RestoringDown, or Minimized -> RestoringUp.
pub fn request_restore(
    window: &mut WindowState,
    metrics: &ShellMetrics,
    effects: &mut Vec<RuntimeEffect>,
) -> bool {
    if window.closed || window.in_transition() {
        return false;
    }
    if window.maximized {
        window.restoring_down = true;
        schedule(window, TransitionKind::RestoreDown, metrics, effects);
        true
    } else if window.minimized {
        window.restoring_up = true;
        schedule(window, TransitionKind::RestoreUp, metrics, effects);
        true
    } else {
        false
    }
}

/// Title-bar maximize button: maximizes a normal window, restores a maximized one.
pub fn toggle_maximize(
    window: &mut WindowState,
    metrics: &ShellMetrics,
    effects: &mut Vec<RuntimeEffect>,
) -> bool {
    if window.maximized {
        request_restore(window, metrics, effects)
    } else {
        request_maximize(window, metrics, effects)
    }
}

/// Retracts an in-flight minimize before it settles.
pub fn cancel_minimize(window: &mut WindowState, effects: &mut Vec<RuntimeEffect>) -> bool {
    if window.closed || !window.minimizing || window.minimized {
        return false;
    }
    window.minimizing = false;
    cancel_pending(window, effects);
    true
}

/// Applies a fired transition timer.
///
/// The delivery is ignored when the window is closed or when `generation` is not the token of
/// the window's current pending transition.
pub fn complete_transition(window: &mut WindowState, kind: TransitionKind, generation: u64) -> bool {
    if window.closed {
        return false;
    }
    let current = PendingTransition { kind, generation };
    if window.pending_transition != Some(current) {
        return false;
    }
    window.pending_transition = None;

    match kind {
        TransitionKind::Minimize => {
            if !window.minimized && !window.maximized {
                window.minimized = true;
            }
        }
        TransitionKind::Maximize => {
            if !window.maximized && !window.minimized {
                window.maximized = true;
                window.rect.previous = Some(window.rect.current);
            }
        }
        TransitionKind::RestoreUp => {
            window.minimized = false;
            window.restoring_up = false;
        }
        TransitionKind::RestoreDown => {
            if window.maximized {
                window.maximized = false;
                if let Some(previous) = window.rect.previous {
                    window.rect.current = previous;
                }
            }
            window.restoring_down = false;
        }
    }
    settle_window(window);
    true
}

/// Runs the steady-state rules for one window to a fixed point.
///
/// A settled steady flag clears its matching transient flag, and a closed window holds no
/// activation or transient state.
pub fn settle_window(window: &mut WindowState) -> bool {
    let mut changed = false;
    for _ in 0..MAX_SETTLE_PASSES {
        let before = (
            window.minimizing,
            window.maximizing,
            window.restoring_up,
            window.restoring_down,
            window.resizing,
            window.active,
        );

        if window.minimized && window.minimizing {
            window.minimizing = false;
        }
        if !window.minimized && window.restoring_up && !window.maximized {
            window.restoring_up = false;
        }
        if window.maximized && window.maximizing {
            window.maximizing = false;
        }
        if !window.maximized && window.restoring_down && !window.minimized {
            window.restoring_down = false;
        }
        if window.minimized || window.maximized {
            window.resizing = false;
        }
        if window.closed {
            window.active = false;
            window.minimizing = false;
            window.maximizing = false;
            window.restoring_up = false;
            window.restoring_down = false;
            window.resizing = false;
        }

        let after = (
            window.minimizing,
            window.maximizing,
            window.restoring_up,
            window.restoring_down,
            window.resizing,
            window.active,
        );
        if before == after {
            break;
        }
        changed = true;
    }
    changed
}

/// Marks the window closed. Terminal: later requests on it are no-ops.
pub fn close(window: &mut WindowState, effects: &mut Vec<RuntimeEffect>) -> bool {
    if window.closed {
        return false;
    }
    window.closed = true;
    window.active = false;
    cancel_pending(window, effects);
    settle_window(window);
    true
}

/// Starts a resize session when the window is neither minimized nor maximized.
pub fn begin_resize(window: &mut WindowState, pointer: Point) -> Option<ResizeSession> {
    let resizing = !window.closed && !window.minimized && !window.maximized;
    window.resizing = resizing;
    if !resizing {
        return None;
    }
    let current = window.rect.current;
    Some(ResizeSession {
        window_id: window.id,
        pointer_start: pointer,
        start_width: current.width,
        start_height: current.height,
        rect_start: current,
    })
}

/// Recomputes the window size for a pointer move.
///
/// The size never drops below the configured minimum. With a known `container`, it never
/// crosses the right edge or the taskbar band above the bottom edge; hitting an edge rebases the
/// session so moving back shrinks the window immediately.
pub fn update_resize(
    window: &mut WindowState,
    session: &mut ResizeSession,
    pointer: Point,
    container: Option<Bounds>,
    metrics: &ShellMetrics,
) -> bool {
    if !window.resizing || window.closed {
        return false;
    }

    let mut width = (session.start_width + (pointer.x - session.pointer_start.x))
        .max(metrics.min_window_width);
    let mut height = (session.start_height + (pointer.y - session.pointer_start.y))
        .max(metrics.min_window_height);

    if let Some(container) = container {
        let current = window.rect.current;
        let max_width = container.right - current.left;
        if width > max_width {
            width = max_width;
            session.pointer_start.x = pointer.x;
            session.start_width = width;
        }
        let max_height = container.bottom - current.top - metrics.resize_taskbar_band;
        if height > max_height {
            height = max_height;
            session.pointer_start.y = pointer.y;
            session.start_height = height;
        }
    }

    let rect = WindowRectState {
        current: Rect {
            width,
            height,
            ..window.rect.current
        },
        previous: Some(session.rect_start),
    };
    commit_rect(window, rect)
}

/// Ends the resize, committing the measured size when the view reports one.
pub fn end_resize(window: &mut WindowState, session: &ResizeSession, measured: Option<Size>) -> bool {
    let was_resizing = std::mem::replace(&mut window.resizing, false);
    if window.closed {
        return was_resizing;
    }
    let current = match measured {
        Some(size) => Rect {
            width: size.width,
            height: size.height,
            ..window.rect.current
        },
        None => window.rect.current,
    };
    let rect = WindowRectState {
        current,
        previous: Some(session.rect_start),
    };
    commit_rect(window, rect) || was_resizing
}

/// Drag-start: a maximized window drops back to its cached geometry immediately.
pub fn begin_drag(window: &mut WindowState, effects: &mut Vec<RuntimeEffect>) -> bool {
    if window.drag_disabled() || !window.maximized {
        return false;
    }
    window.maximized = false;
    if window.restoring_down || window.maximizing {
        window.restoring_down = false;
        window.maximizing = false;
        cancel_pending(window, effects);
    }
    if let Some(previous) = window.rect.previous {
        commit_rect(window, WindowRectState::new(previous));
    }
    true
}

/// Drag-end: stores the dropped screen position relative to `container_origin`.
pub fn end_drag(window: &mut WindowState, client_rect: Rect, container_origin: Point) -> bool {
    if window.drag_disabled() {
        return false;
    }
    let rect = WindowRectState {
        current: Rect {
            top: client_rect.top - container_origin.y,
            left: client_rect.left - container_origin.x,
            width: client_rect.width,
            height: client_rect.height,
        },
        previous: window.rect.previous,
    };
    commit_rect(window, rect)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{AppId, WindowId, WindowPhase};

    fn window() -> WindowState {
        WindowState::new(
            WindowId(1),
            AppId::Explorer,
            "Explorer",
            "/explorer.svg",
            Rect::new(10.0, 10.0, 300.0, 200.0),
            1,
        )
    }

    fn fire(window: &mut WindowState, effects: &[RuntimeEffect]) -> bool {
        let Some(RuntimeEffect::ScheduleTransition {
            transition,
            generation,
            ..
        }) = effects
            .iter()
            .rev()
            .find(|e| matches!(e, RuntimeEffect::ScheduleTransition { .. }))
        else {
            panic!("no transition scheduled");
        };
        complete_transition(window, *transition, *generation)
    }

    #[test]
    fn minimize_settles_after_timer() {
        let metrics = ShellMetrics::default();
        let mut win = window();
        let mut effects = Vec::new();

        assert!(request_minimize(&mut win, &metrics, &mut effects));
        assert_eq!(win.phase(), WindowPhase::Minimizing);
        assert_eq!(
            effects,
            vec![RuntimeEffect::ScheduleTransition {
                window_id: WindowId(1),
                transition: TransitionKind::Minimize,
                generation: 1,
                delay_ms: 300,
            }]
        );

        assert!(fire(&mut win, &effects));
        assert!(win.minimized());
        assert!(!win.minimizing());
        assert_eq!(win.phase(), WindowPhase::Minimized);
    }

    #[test]
    fn restore_up_returns_to_normal() {
        let metrics = ShellMetrics::default();
        let mut win = window();
        let mut effects = Vec::new();
        request_minimize(&mut win, &metrics, &mut effects);
        fire(&mut win, &effects);

        effects.clear();
        assert!(request_restore(&mut win, &metrics, &mut effects));
        assert_eq!(win.phase(), WindowPhase::RestoringUp);
        fire(&mut win, &effects);
        assert_eq!(win.phase(), WindowPhase::Normal);
        assert!(!win.minimized());
        assert!(!win.restoring_up());
    }

    #[test]
    fn maximize_caches_rect_and_restore_down_brings_it_back() {
        let metrics = ShellMetrics::default();
        let mut win = window();
        let mut effects = Vec::new();

        assert!(toggle_maximize(&mut win, &metrics, &mut effects));
        fire(&mut win, &effects);
        assert_eq!(win.phase(), WindowPhase::Maximized);
        assert_eq!(win.rect().previous, Some(Rect::new(10.0, 10.0, 300.0, 200.0)));

        effects.clear();
        assert!(toggle_maximize(&mut win, &metrics, &mut effects));
        assert_eq!(win.phase(), WindowPhase::RestoringDown);
        fire(&mut win, &effects);
        assert_eq!(win.phase(), WindowPhase::Normal);
        assert_eq!(win.rect().current, Rect::new(10.0, 10.0, 300.0, 200.0));
    }

    #[test]
    fn minimize_is_refused_while_maximized() {
        let metrics = ShellMetrics::default();
        let mut win = window();
        let mut effects = Vec::new();
        request_maximize(&mut win, &metrics, &mut effects);
        fire(&mut win, &effects);

        effects.clear();
        assert!(!request_minimize(&mut win, &metrics, &mut effects));
        assert!(effects.is_empty());
        assert!(!(win.minimized() && win.maximized()));
    }

    #[test]
    fn stale_generation_is_ignored() {
        let metrics = ShellMetrics::default();
        let mut win = window();
        let mut effects = Vec::new();
        request_minimize(&mut win, &metrics, &mut effects);
        assert!(cancel_minimize(&mut win, &mut effects));

        assert!(!complete_transition(&mut win, TransitionKind::Minimize, 1));
        assert!(!win.minimized());
        assert_eq!(win.phase(), WindowPhase::Normal);
        assert!(effects.contains(&RuntimeEffect::CancelTransition {
            window_id: WindowId(1)
        }));
    }

    #[test]
    fn closing_mid_transition_blocks_the_timer() {
        let metrics = ShellMetrics::default();
        let mut win = window();
        let mut effects = Vec::new();
        request_minimize(&mut win, &metrics, &mut effects);
        win.active = true;

        assert!(close(&mut win, &mut effects));
        assert!(!complete_transition(&mut win, TransitionKind::Minimize, 1));
        assert!(!win.minimized());
        assert!(!win.minimizing());
        assert!(!win.active());
        assert!(!close(&mut win, &mut effects));
        assert!(!request_maximize(&mut win, &metrics, &mut effects));
    }

    #[test]
    fn resize_clamps_to_minimum_and_container() {
        let metrics = ShellMetrics::default();
        let mut win = window();
        let mut session = begin_resize(&mut win, Point::new(310.0, 210.0)).expect("session");
        assert_eq!(win.phase(), WindowPhase::Resizing);

        update_resize(&mut win, &mut session, Point::new(0.0, 0.0), None, &metrics);
        assert_eq!(win.rect().current.width, 200.0);
        assert_eq!(win.rect().current.height, 150.0);

        let container = Bounds::new(0.0, 0.0, 500.0, 400.0);
        update_resize(
            &mut win,
            &mut session,
            Point::new(900.0, 900.0),
            Some(container),
            &metrics,
        );
        assert_eq!(win.rect().current.width, 490.0);
        assert_eq!(win.rect().current.height, 400.0 - 10.0 - 48.0);
        // Rebased at the edge: pulling back 40 units shrinks right away.
        update_resize(
            &mut win,
            &mut session,
            Point::new(860.0, 900.0),
            Some(container),
            &metrics,
        );
        assert_eq!(win.rect().current.width, 450.0);

        assert!(end_resize(&mut win, &session, None));
        assert!(!win.resizing());
        assert_eq!(win.rect().previous, Some(Rect::new(10.0, 10.0, 300.0, 200.0)));
    }

    #[test]
    fn resize_is_refused_when_maximized() {
        let metrics = ShellMetrics::default();
        let mut win = window();
        let mut effects = Vec::new();
        request_maximize(&mut win, &metrics, &mut effects);
        fire(&mut win, &effects);

        assert!(begin_resize(&mut win, Point::default()).is_none());
        assert!(!win.resizing());
    }

    #[test]
    fn drag_start_unmaximizes_synchronously() {
        let metrics = ShellMetrics::default();
        let mut win = window();
        let mut effects = Vec::new();
        request_maximize(&mut win, &metrics, &mut effects);
        fire(&mut win, &effects);

        effects.clear();
        assert!(begin_drag(&mut win, &mut effects));
        assert!(!win.maximized());
        assert_eq!(
            win.rect(),
            WindowRectState::new(Rect::new(10.0, 10.0, 300.0, 200.0))
        );
        assert!(effects.is_empty());
        assert!(!begin_drag(&mut win, &mut effects));
    }

    #[test]
    fn drag_end_translates_and_keeps_previous() {
        let mut win = window();
        win.rect.previous = Some(Rect::new(1.0, 2.0, 3.0, 4.0));

        let moved = end_drag(
            &mut win,
            Rect::new(140.0, 260.0, 300.0, 200.0),
            Point::new(20.0, 40.0),
        );
        assert!(moved);
        assert_eq!(win.rect().current, Rect::new(100.0, 240.0, 300.0, 200.0));
        assert_eq!(win.rect().previous, Some(Rect::new(1.0, 2.0, 3.0, 4.0)));

        assert!(!end_drag(
            &mut win,
            Rect::new(140.0, 260.0, 300.0, 200.0),
            Point::new(20.0, 40.0),
        ));
    }
}
