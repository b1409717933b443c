//! Record of static emissions, replayed to listeners that subscribe late.

use crate::event::scopes_match;
use std::collections::HashMap;
use std::sync::Arc;

struct Record<A> {
    id: String,
    args: Arc<A>,
}

pub(crate) struct Ledger<A> {
    records: HashMap<String, Vec<Record<A>>>,
}

impl<A> Default for Ledger<A> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl<A> Ledger<A> {
    pub(crate) fn record(&mut self, event: &str, id: &str, args: Arc<A>) {
        self.records
            .entry(event.to_owned())
            .or_default()
            .push(Record {
                id: id.to_owned(),
                args,
            });
    }

    /// Forgets every recorded emission of `event`, returning how many there were.
    pub(crate) fn cancel(&mut self, event: &str) -> usize {
        self.records.remove(event).map(|r| r.len()).unwrap_or(0)
    }

    /// Arguments of every recorded emission a listener scoped to `id` should
    /// receive, oldest first. Records are kept.
    pub(crate) fn replays_for(&self, event: &str, id: &str) -> Vec<Arc<A>> {
        self.records
            .get(event)
            .into_iter()
            .flatten()
            .filter(|record| scopes_match(&record.id, id))
            .map(|record| Arc::clone(&record.args))
            .collect()
    }

    pub(crate) fn len(&self, event: &str) -> usize {
        self.records.get(event).map(Vec::len).unwrap_or(0)
    }
}
