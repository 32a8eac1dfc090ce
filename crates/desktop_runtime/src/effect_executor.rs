//! Executes reducer-emitted runtime effects against a timer host.
//!
//! The executor owns the timer handles for pending lifecycle transitions, keyed by window, so a
//! superseding schedule, an explicit cancel, or the window's removal all clear the host timer.
//! It also records which windows currently hold document-level resize listeners.

use std::collections::{BTreeSet, HashMap};

use leptos::*;
use platform_host::{ThemeMode, TimerHost, TimerId};

use crate::{
    host,
    model::WindowId,
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

pub struct EffectExecutor<H> {
    timers: H,
    pending: HashMap<WindowId, TimerId>,
    resize_listeners: BTreeSet<WindowId>,
    applied_theme: Option<ThemeMode>,
}

impl<H: TimerHost<DesktopAction>> EffectExecutor<H> {
    pub fn new(timers: H) -> Self {
        Self {
            timers,
            pending: HashMap::new(),
            resize_listeners: BTreeSet::new(),
            applied_theme: None,
        }
    }

    pub fn timers(&self) -> &H {
        &self.timers
    }

    /// Windows with a transition timer the executor still considers live.
    pub fn pending_timers(&self) -> usize {
        self.pending.len()
    }

    pub fn resize_listeners(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.resize_listeners.iter().copied()
    }

    pub fn applied_theme(&self) -> Option<ThemeMode> {
        self.applied_theme
    }

    /// Executes one effect.
    pub fn run(&mut self, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::ScheduleTransition {
                window_id,
                transition,
                generation,
                delay_ms,
            } => {
                self.cancel(window_id);
                let timer = self.timers.schedule(
                    delay_ms,
                    DesktopAction::CompleteTransition {
                        window_id,
                        transition,
                        generation,
                    },
                );
                self.pending.insert(window_id, timer);
            }
            RuntimeEffect::CancelTransition { window_id } => self.cancel(window_id),
            RuntimeEffect::AttachResizeListeners(window_id) => {
                self.resize_listeners.insert(window_id);
            }
            RuntimeEffect::DetachResizeListeners(window_id) => {
                self.resize_listeners.remove(&window_id);
            }
            RuntimeEffect::ApplyTheme(mode) => self.applied_theme = Some(mode),
            RuntimeEffect::WindowRemoved(window_id) => {
                self.cancel(window_id);
                self.resize_listeners.remove(&window_id);
            }
        }
    }

    /// Forgets the timer handle for a transition that just fired.
    pub fn acknowledge(&mut self, action: &DesktopAction) {
        if let DesktopAction::CompleteTransition { window_id, .. } = action {
            self.pending.remove(window_id);
        }
    }

    fn cancel(&mut self, window_id: WindowId) {
        if let Some(timer) = self.pending.remove(&window_id) {
            self.timers.cancel(timer);
        }
    }
}

/// Drains the runtime effect queue once.
///
/// The queue is cleared before processing so dispatches made while draining enqueue a fresh
/// batch instead of being overwritten.
pub fn drain(runtime: DesktopRuntimeContext) {
    let queued = runtime.effects.get_untracked();
    if queued.is_empty() {
        return;
    }
    runtime.effects.set(Vec::new());

    for effect in queued {
        if let RuntimeEffect::ApplyTheme(mode) = &effect {
            let mode = *mode;
            if let Err(err) = host::apply_theme(mode) {
                logging::warn!("applying theme `{}` failed: {err}", mode.as_str());
            }
        }
        runtime.executor.update_value(|executor| executor.run(effect));
    }
}

/// Installs the effect executor that drains reducer-emitted runtime effects in order.
pub fn install(runtime: DesktopRuntimeContext) {
    create_effect(move |_| {
        if runtime.effects.with(Vec::is_empty) {
            return;
        }
        drain(runtime);
    });
}
