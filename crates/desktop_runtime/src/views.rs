//! Entity-to-view handle registry.
//!
//! State records never point at their rendered views. A rendering layer that needs the mounted
//! element for a window or icon registers a handle here and looks it up by id; a lookup may miss
//! because the view is not mounted yet or was already torn down.

use std::collections::HashMap;

use crate::{
    model::{IconId, WindowId},
    reducer::RuntimeEffect,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Window(WindowId),
    Icon(IconId),
}

#[derive(Debug)]
pub struct ViewRegistry<H> {
    handles: HashMap<EntityRef, H>,
}

impl<H> Default for ViewRegistry<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H> ViewRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the handle for `entity`, returning the one it replaced.
    pub fn register(&mut self, entity: EntityRef, handle: H) -> Option<H> {
        self.handles.insert(entity, handle)
    }

    pub fn unregister(&mut self, entity: EntityRef) -> Option<H> {
        self.handles.remove(&entity)
    }

    pub fn get(&self, entity: EntityRef) -> Option<&H> {
        self.handles.get(&entity)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Drops handles for entities an effect reports as gone.
    pub fn release(&mut self, effect: &RuntimeEffect) {
        if let RuntimeEffect::WindowRemoved(window_id) = effect {
            self.handles.remove(&EntityRef::Window(*window_id));
        }
    }
}
