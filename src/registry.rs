//! Two-level listener lookup: event name, then scope id, then listeners in
//! registration order.

use crate::event::{GLOBAL, is_global};
use crate::listener::{Listener, ListenerKey};
use std::collections::HashMap;

/// A deregistration request. Applied at once when idle, queued while a
/// dispatch is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Removal {
    /// Every listener of the event, under every id.
    Event { event: String },
    /// Every listener of one `(event, id)` bucket.
    Bucket { event: String, id: String },
    /// The first entry carrying `key` in one bucket.
    Listener {
        event: String,
        id: String,
        key: ListenerKey,
    },
}

pub(crate) struct Registry<A, R> {
    events: HashMap<String, HashMap<String, Vec<Listener<A, R>>>>,
}

impl<A, R> Default for Registry<A, R> {
    fn default() -> Self {
        Self {
            events: HashMap::new(),
        }
    }
}

impl<A, R> Registry<A, R> {
    pub(crate) fn add(&mut self, event: &str, id: &str, listener: Listener<A, R>) {
        self.events
            .entry(event.to_owned())
            .or_default()
            .entry(id.to_owned())
            .or_default()
            .push(listener);
    }

    pub(crate) fn bucket(&self, event: &str, id: &str) -> &[Listener<A, R>] {
        self.events
            .get(event)
            .and_then(|ids| ids.get(id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Snapshot of the listeners an emission scoped to `id` reaches: the id's
    /// own bucket first, then the global bucket.
    pub(crate) fn dispatch_order(&self, event: &str, id: &str) -> Vec<Listener<A, R>> {
        let mut order = self.bucket(event, id).to_vec();
        if !is_global(id) {
            order.extend_from_slice(self.bucket(event, GLOBAL));
        }
        order
    }

    pub(crate) fn keys(&self, event: &str, id: &str) -> Vec<ListenerKey> {
        self.bucket(event, id).iter().map(Listener::key).collect()
    }

    /// Applies `removal`, returning how many entries went away.
    pub(crate) fn remove(&mut self, removal: &Removal) -> usize {
        match removal {
            Removal::Event { event } => self
                .events
                .remove(event)
                .map(|ids| ids.values().map(Vec::len).sum())
                .unwrap_or(0),
            Removal::Bucket { event, id } => {
                let Some(ids) = self.events.get_mut(event) else {
                    return 0;
                };
                let removed = ids.remove(id).map(|bucket| bucket.len()).unwrap_or(0);
                if ids.is_empty() {
                    self.events.remove(event);
                }
                removed
            }
            Removal::Listener { event, id, key } => {
                let Some(ids) = self.events.get_mut(event) else {
                    return 0;
                };
                let Some(bucket) = ids.get_mut(id) else {
                    return 0;
                };
                let Some(index) = bucket.iter().position(|l| l.key() == *key) else {
                    return 0;
                };
                bucket.remove(index);
                if bucket.is_empty() {
                    ids.remove(id);
                }
                if ids.is_empty() {
                    self.events.remove(event);
                }
                1
            }
        }
    }
}

impl<A: 'static, R: 'static> Registry<A, R> {
    /// Whether `(event, id)` reaches a listener that can still be called.
    pub(crate) fn reaches(&self, event: &str, id: &str) -> bool {
        let live = |bucket: &[Listener<A, R>]| bucket.iter().any(|l| !l.is_spent());
        live(self.bucket(event, id)) || (!is_global(id) && live(self.bucket(event, GLOBAL)))
    }
}
