use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use shared::domain::TodoVm;

pub type Listener = Arc<dyn Fn(&[TodoVm]) + Send + Sync>;

/// Callbacks registered against the todo stream, keyed by registration order.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    inner: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

impl ListenerRegistry {
    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn register(self: &Arc<Self>, listener: Listener) -> Subscription {
        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.insert(id, listener);
        tracing::debug!(subscription = id, "todo listener registered");
        Subscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) -> bool {
        self.state().listeners.remove(&id).is_some()
    }

    fn contains(&self, id: u64) -> bool {
        self.state().listeners.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.state().listeners.len()
    }

    /// Invokes every listener in registration order.
    ///
    /// The registry lock is released while callbacks run so a listener may
    /// drop its own subscription; listeners removed mid-dispatch are skipped.
    pub(crate) fn dispatch(&self, todos: &[TodoVm]) {
        let listeners: Vec<(u64, Listener)> = self
            .state()
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        for (id, listener) in listeners {
            if self.contains(id) {
                listener(todos);
            }
        }
    }
}

/// Scoped registration on the todo stream. Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes its listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.remove(self.id) {
                tracing::debug!(subscription = self.id, "todo listener unsubscribed");
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
