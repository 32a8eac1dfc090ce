//! Browser adapters for the runtime's host services.
//!
//! On `wasm32` targets transition timers are backed by `setTimeout` and the active theme is
//! written to the document root's `data-theme` attribute. Other targets get inert stand-ins so the
//! runtime can be driven headlessly.

use platform_host::ThemeMode;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures while touching the host document.
pub enum HostError {
    /// No `window`/`document`/root element is reachable.
    #[error("document root element unavailable")]
    NoDocument,
    /// The DOM rejected an attribute or class update.
    #[error("dom update rejected: {0}")]
    Dom(String),
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::{cell::RefCell, collections::HashMap, rc::Rc, time::Duration};

    use leptos::{
        leptos_dom::helpers::TimeoutHandle, logging, set_timeout_with_handle, Callable, Callback,
    };
    use platform_host::{ThemeMode, TimerHost, TimerId};

    use super::HostError;
    use crate::reducer::DesktopAction;

    /// `setTimeout`-backed timer host that dispatches the payload action when it fires.
    pub struct BrowserTimerHost {
        dispatch: Callback<DesktopAction>,
        next_id: u64,
        handles: Rc<RefCell<HashMap<TimerId, TimeoutHandle>>>,
    }

    impl BrowserTimerHost {
        pub fn new(dispatch: Callback<DesktopAction>) -> Self {
            Self {
                dispatch,
                next_id: 1,
                handles: Rc::new(RefCell::new(HashMap::new())),
            }
        }
    }

    impl TimerHost<DesktopAction> for BrowserTimerHost {
        fn schedule(&mut self, delay_ms: u64, payload: DesktopAction) -> TimerId {
            let id = TimerId(self.next_id);
            self.next_id = self.next_id.saturating_add(1);
            let dispatch = self.dispatch;
            let handles = Rc::clone(&self.handles);
            let fire = move || {
                handles.borrow_mut().remove(&id);
                dispatch.call(payload);
            };
            match set_timeout_with_handle(fire, Duration::from_millis(delay_ms)) {
                Ok(handle) => {
                    self.handles.borrow_mut().insert(id, handle);
                }
                Err(err) => logging::warn!("scheduling transition timer failed: {err:?}"),
            }
            id
        }

        fn cancel(&mut self, timer: TimerId) -> bool {
            match self.handles.borrow_mut().remove(&timer) {
                Some(handle) => {
                    handle.clear();
                    true
                }
                None => false,
            }
        }
    }

    pub fn apply_theme(mode: ThemeMode) -> Result<(), HostError> {
        let root = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            .ok_or(HostError::NoDocument)?;
        root.set_attribute("data-theme", mode.as_str())
            .map_err(|err| HostError::Dom(format!("{err:?}")))?;
        let classes = root.class_list();
        classes
            .toggle_with_force("dark", mode == ThemeMode::Dark)
            .map_err(|err| HostError::Dom(format!("{err:?}")))?;
        Ok(())
    }

    pub fn prefers_dark() -> Option<bool> {
        web_sys::window()?
            .match_media("(prefers-color-scheme: dark)")
            .ok()
            .flatten()
            .map(|query| query.matches())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTimerHost;

/// Writes the active scheme onto the document root.
#[cfg(target_arch = "wasm32")]
pub fn apply_theme(mode: ThemeMode) -> Result<(), HostError> {
    browser::apply_theme(mode)
}

/// No document outside the browser; theme application is a no-op.
#[cfg(not(target_arch = "wasm32"))]
pub fn apply_theme(_mode: ThemeMode) -> Result<(), HostError> {
    Ok(())
}

/// The host's `prefers-color-scheme: dark` answer, when it has one.
#[cfg(target_arch = "wasm32")]
pub fn system_prefers_dark() -> Option<bool> {
    browser::prefers_dark()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn system_prefers_dark() -> Option<bool> {
    None
}
