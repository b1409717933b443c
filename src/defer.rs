use papaya::HashMap;
use tokio_util::sync::CancellationToken;

/// One pending debounce timer per event name.
///
/// Each timer is a [`CancellationToken`]; arming a new timer for an event
/// cancels the previous one. A timer that fired is cancelled too, so only a
/// live token means "emission still pending".
#[derive(Default)]
pub(crate) struct DeferTable {
    timers: HashMap<String, CancellationToken>,
}

impl DeferTable {
    pub(crate) fn arm(&self, event: &str) -> CancellationToken {
        let token = CancellationToken::new();
        let timers = self.timers.pin();
        if let Some(previous) = timers.insert(event.to_owned(), token.clone()) {
            previous.cancel();
        }
        token
    }

    pub(crate) fn is_pending(&self, event: &str) -> bool {
        self.timers
            .pin()
            .get(event)
            .is_some_and(|token| !token.is_cancelled())
    }

    pub(crate) fn cancel_all(&self) {
        for (_, token) in self.timers.pin().iter() {
            token.cancel();
        }
    }
}
