//! Session change notifications
//!
//! Listeners are invoked synchronously, in registration order, on the task
//! that changed the cache. A listener must not subscribe or dispose from
//! inside its own callback.

use std::sync::{Arc, Mutex, Weak};

use crate::core::mutex_ext::MutexExt;

use super::session::Session;

/// Sessions added, removed or changed by a single cache update.
///
/// `changed` is always empty for this provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionChangeEvent {
    pub added: Vec<Session>,
    pub removed: Vec<Session>,
    pub changed: Vec<Session>,
}

impl SessionChangeEvent {
    pub fn added(session: Session) -> Self {
        Self {
            added: vec![session],
            ..Default::default()
        }
    }

    pub fn removed(session: Session) -> Self {
        Self {
            removed: vec![session],
            ..Default::default()
        }
    }
}

pub type SessionListener = Box<dyn Fn(&SessionChangeEvent) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, SessionListener)>,
    disposed: bool,
}

/// Observer list for [`SessionChangeEvent`]s
#[derive(Default)]
pub struct SessionChangeEmitter {
    listeners: Arc<Mutex<Listeners>>,
}

impl SessionChangeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. After disposal the returned subscription is inert.
    pub fn subscribe(&self, listener: SessionListener) -> Subscription {
        let mut listeners = self.listeners.lock_or_recover();
        if listeners.disposed {
            return Subscription {
                id: 0,
                listeners: Weak::new(),
            };
        }

        listeners.next_id += 1;
        let id = listeners.next_id;
        listeners.entries.push((id, listener));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn fire(&self, event: &SessionChangeEvent) {
        let listeners = self.listeners.lock_or_recover();
        for (_, listener) in listeners.entries.iter() {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock_or_recover().entries.len()
    }

    /// Drop every listener. Safe to call more than once.
    pub fn dispose(&self) {
        let mut listeners = self.listeners.lock_or_recover();
        listeners.entries.clear();
        listeners.disposed = true;
    }
}

/// Handle returned by [`SessionChangeEmitter::subscribe`]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Stop receiving events. Idempotent.
    pub fn dispose(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .lock_or_recover()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}
