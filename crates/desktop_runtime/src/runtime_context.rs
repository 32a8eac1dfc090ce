//! Reactive runtime container for the desktop shell.
//!
//! Owns the long-lived reducer state signals, the runtime effect queue, and the effect executor.
//! Views read through the signals and selectors here and mutate only by dispatching
//! [`DesktopAction`] values.
#![allow(clippy::clone_on_copy)]

use leptos::*;
use platform_host::TimerHost;

use crate::{
    effect_executor::{self, EffectExecutor},
    host,
    model::{DesktopState, IconId, InteractionState, WindowId},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
};

/// Timer host type erased so browser and virtual hosts share one context type.
pub type DynTimerHost = Box<dyn TimerHost<DesktopAction>>;

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Reactive pointer/resize interaction state signal.
    pub interaction: RwSignal<InteractionState>,
    /// Queue of runtime effects emitted by the reducer and drained by the executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Timer and listener bookkeeping for emitted effects.
    pub executor: StoredValue<EffectExecutor<DynTimerHost>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Selector for the active window id; only notifies when the id changes.
    pub fn active_window(&self) -> Memo<Option<WindowId>> {
        let state = self.state;
        create_memo(move |_| state.with(DesktopState::active_window_id))
    }

    /// Selector for the active desktop icon id.
    pub fn active_icon(&self) -> Memo<Option<IconId>> {
        let state = self.state;
        create_memo(move |_| state.with(DesktopState::active_icon_id))
    }
}

/// Creates the runtime, provides it as context, and installs the effect executor.
///
/// `timers` receives the dispatch callback so a host timer can feed fired transitions back in.
pub fn provide_desktop_runtime(
    initial: DesktopState,
    timers: impl FnOnce(Callback<DesktopAction>) -> DynTimerHost,
) -> DesktopRuntimeContext {
    let state = create_rw_signal(initial);
    let interaction = create_rw_signal(InteractionState::default());
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        let mut ui = interaction.get_untracked();
        let previous_desktop = desktop.clone();
        let previous_ui = ui.clone();

        match reduce_desktop(&mut desktop, &mut ui, action) {
            Ok(new_effects) => {
                if desktop != previous_desktop {
                    state.set(desktop);
                }
                if ui != previous_ui {
                    interaction.set(ui);
                }
                if !new_effects.is_empty() {
                    let mut queue = effects.get_untracked();
                    queue.extend(new_effects);
                    effects.set(queue);
                }
            }
            Err(err) => logging::warn!("desktop reducer error: {err}"),
        }
    });

    let executor = store_value(EffectExecutor::new(timers(dispatch)));
    let runtime = DesktopRuntimeContext {
        state,
        interaction,
        effects,
        executor,
        dispatch,
    };

    provide_context(runtime.clone());
    effect_executor::install(runtime);
    if let Some(prefers_dark) = host::system_prefers_dark() {
        runtime.dispatch_action(DesktopAction::SystemThemeChanged { prefers_dark });
    }
    runtime
}

/// Provides a runtime backed by `setTimeout`.
#[cfg(target_arch = "wasm32")]
pub fn provide_browser_desktop_runtime(initial: DesktopState) -> DesktopRuntimeContext {
    provide_desktop_runtime(initial, |dispatch| -> DynTimerHost {
        Box::new(host::BrowserTimerHost::new(dispatch))
    })
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called before [`provide_desktop_runtime`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}

#[cfg(test)]
mod tests {
    use platform_host::VirtualTimerQueue;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{apps::test_catalog, model::AppId};

    fn runtime(queue: &VirtualTimerQueue<DesktopAction>) -> DesktopRuntimeContext {
        let queue = queue.clone();
        provide_desktop_runtime(
            DesktopState::from_catalog(Default::default(), &test_catalog()),
            move |_| -> DynTimerHost { Box::new(queue) },
        )
    }

    #[test]
    fn dispatch_updates_state_and_schedules_timers() {
        let _ = create_runtime();
        let queue = VirtualTimerQueue::new();
        let runtime = runtime(&queue);
        let active = runtime.active_window();

        runtime.dispatch_action(DesktopAction::OpenWindow {
            app_id: AppId::Explorer,
        });
        let window_id = active.get_untracked().expect("window opened");
        assert_eq!(runtime.state.with_untracked(|s| s.windows().count()), 1);

        runtime.dispatch_action(DesktopAction::MinimizeWindow { window_id });
        effect_executor::drain(runtime);
        assert_eq!(queue.pending_len(), 1);
        assert!(runtime.effects.with_untracked(Vec::is_empty));

        for fired in queue.advance_by(300) {
            runtime.dispatch_action(fired);
        }
        let minimized = runtime
            .state
            .with_untracked(|s| s.window(window_id).map(|w| w.minimized()));
        assert_eq!(minimized, Some(true));
    }

    #[test]
    fn reducer_errors_leave_state_untouched() {
        let _ = create_runtime();
        let queue = VirtualTimerQueue::new();
        let runtime = runtime(&queue);
        let before = runtime.state.get_untracked();

        runtime.dispatch_action(DesktopAction::CloseWindow {
            window_id: WindowId(404),
        });

        assert_eq!(runtime.state.get_untracked(), before);
        assert!(runtime.effects.with_untracked(Vec::is_empty));
    }
}
