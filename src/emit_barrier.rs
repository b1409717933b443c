use crate::registry::Removal;

/// Tracks whether a dispatch is running and holds the removals requested
/// while it is.
///
/// Dispatches nest (a listener may emit), so the barrier counts depth and
/// only releases the queued removals when the outermost dispatch leaves.
#[derive(Debug, Default)]
pub(crate) struct EmitBarrier {
    depth: usize,
    pending: Vec<Removal>,
}

impl EmitBarrier {
    #[inline]
    pub(crate) fn enter(&mut self) {
        self.depth += 1;
    }

    /// Leaves one dispatch level. Returns the queued removals, in request
    /// order, once no dispatch is left running.
    pub(crate) fn leave(&mut self) -> Vec<Removal> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            std::mem::take(&mut self.pending)
        } else {
            Vec::new()
        }
    }

    #[inline]
    pub(crate) fn is_emitting(&self) -> bool {
        self.depth > 0
    }

    /// Queues `removal` if a dispatch is running, otherwise hands it back.
    pub(crate) fn hold(&mut self, removal: Removal) -> Option<Removal> {
        if self.is_emitting() {
            self.pending.push(removal);
            None
        } else {
            Some(removal)
        }
    }

    pub(crate) fn queued(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear(event: &str) -> Removal {
        Removal::Event {
            event: event.into(),
        }
    }

    #[test]
    fn idle_barrier_hands_removals_back() {
        let mut barrier = EmitBarrier::default();
        assert_eq!(barrier.hold(clear("a")), Some(clear("a")));
        assert_eq!(barrier.queued(), 0);
    }

    #[test]
    fn removals_wait_for_the_outermost_dispatch() {
        let mut barrier = EmitBarrier::default();
        barrier.enter();
        assert_eq!(barrier.hold(clear("a")), None);
        barrier.enter();
        assert_eq!(barrier.hold(clear("b")), None);

        assert!(barrier.leave().is_empty());
        assert!(barrier.is_emitting());

        assert_eq!(barrier.leave(), vec![clear("a"), clear("b")]);
        assert!(!barrier.is_emitting());
    }
}
