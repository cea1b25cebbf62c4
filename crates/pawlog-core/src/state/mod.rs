//! View-state containers.
//!
//! Containers are plain objects handed to whoever needs them. Each keeps a
//! value-typed state whose reducers return a new state; the container applies
//! the reducer, persists the change, and then calls its subscribers.

mod health;
mod notifications;
mod profile;

pub use health::*;
pub use notifications::*;
pub use profile::*;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

type Callback<S> = Box<dyn Fn(&S) + Send + Sync>;

/// Callbacks run after every state change.
pub struct Subscribers<S> {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback<S>)>,
}

impl<S> Default for Subscribers<S> {
    fn default() -> Self {
        Self {
            next_id: 1,
            callbacks: Vec::new(),
        }
    }
}

impl<S> Subscribers<S> {
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        self.callbacks.len() != before
    }

    pub fn emit(&self, state: &S) {
        for (_, callback) in &self.callbacks {
            callback(state);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}
