//! Frame-tick dispatcher.
//!
//! Components that want a callback every frame register their [`ListenerId`]
//! here. The owning plugin's system walks the registered ids once per frame,
//! so the dispatcher itself never holds on to the listeners.

use std::fmt;

use bevy_ecs::prelude::Resource;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Resource, Debug, Default)]
pub struct FrameListeners {
    // Registration order is the dispatch order.
    registered: Vec<ListenerId>,
}

impl FrameListeners {
    /// Returns false if the id was already registered.
    pub fn register(&mut self, id: ListenerId) -> bool {
        if self.is_registered(id) {
            return false;
        }
        self.registered.push(id);
        true
    }

    /// Returns false if the id was not registered.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        match self.registered.iter().position(|&r| r == id) {
            Some(index) => {
                self.registered.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.registered.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.registered.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}
