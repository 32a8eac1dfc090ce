//! Headless desktop driver: reducer, effect executor, and a virtual clock in one value.
//!
//! Used by tests and by non-browser hosts that replay gestures without a document.

use platform_host::VirtualTimerQueue;

use crate::{
    config::{ConfigError, ShellMetrics},
    effect_executor::EffectExecutor,
    model::{DesktopState, InteractionState},
    reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
    views::ViewRegistry,
};

pub struct HeadlessDesktop<V = ()> {
    state: DesktopState,
    interaction: InteractionState,
    clock: VirtualTimerQueue<DesktopAction>,
    executor: EffectExecutor<VirtualTimerQueue<DesktopAction>>,
    views: ViewRegistry<V>,
}

impl<V> HeadlessDesktop<V> {
    pub fn new(state: DesktopState) -> Self {
        let clock = VirtualTimerQueue::new();
        Self {
            state,
            interaction: InteractionState::default(),
            executor: EffectExecutor::new(clock.clone()),
            clock,
            views: ViewRegistry::new(),
        }
    }

    /// Boots from the built-in app catalog.
    pub fn boot(metrics: ShellMetrics) -> Result<Self, ConfigError> {
        DesktopState::boot(metrics).map(Self::new)
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn executor(&self) -> &EffectExecutor<VirtualTimerQueue<DesktopAction>> {
        &self.executor
    }

    pub fn views(&self) -> &ViewRegistry<V> {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut ViewRegistry<V> {
        &mut self.views
    }

    /// Virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Reduces one action and executes its effects.
    pub fn dispatch(&mut self, action: DesktopAction) -> Result<Vec<RuntimeEffect>, ReducerError> {
        self.executor.acknowledge(&action);
        let effects = reduce_desktop(&mut self.state, &mut self.interaction, action)?;
        for effect in &effects {
            self.views.release(effect);
            self.executor.run(effect.clone());
        }
        Ok(effects)
    }

    /// Advances the virtual clock, dispatching every transition timer that comes due.
    ///
    /// Timers scheduled by a fired transition are themselves delivered if they fall inside the
    /// window. Returns the number of timers fired.
    pub fn advance_clock(&mut self, delta_ms: u64) -> Result<usize, ReducerError> {
        let until = self.clock.now_ms().saturating_add(delta_ms);
        let mut fired = 0;
        while let Some(action) = self.clock.pop_due(until) {
            self.dispatch(action)?;
            fired += 1;
        }
        self.clock.set_now(until);
        Ok(fired)
    }
}
