use crate::listener::{Handler, Listener};
use crate::Reply;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Admits the wrapped listener a limited number of times.
///
/// `exhausted` runs when the last admission is granted, before the wrapped
/// listener is invoked; the emitter uses it to deregister the wrapper.
pub struct WithTimes<A, R> {
    listener: Listener<A, R>,
    remaining: AtomicUsize,
    exhausted: Box<dyn Fn() + Send + Sync>,
}

impl<A, R> WithTimes<A, R> {
    pub fn new(
        times: usize,
        listener: Listener<A, R>,
        exhausted: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        assert!(times > 0, "limit must be greater than zero, got {times}");
        Self {
            listener,
            remaining: AtomicUsize::new(times),
            exhausted: Box::new(exhausted),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }
}

impl<A, R> Handler<A, R> for WithTimes<A, R>
where
    A: Send + Sync + 'static,
    R: Send + 'static,
{
    fn admit(&self) -> bool {
        let taken = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        match taken {
            Ok(1) => {
                (self.exhausted)();
                self.listener.admit()
            }
            Ok(_) => self.listener.admit(),
            Err(_) => false,
        }
    }

    fn is_spent(&self) -> bool {
        self.remaining() == 0 || self.listener.is_spent()
    }

    #[inline]
    fn handle(&self, args: &A) -> Reply<R> {
        self.listener.handle(args)
    }
}
