mod from_fn;
mod with_times;

use crate::Reply;
use crate::event::Payload;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use from_fn::*;
pub use with_times::*;

/// The behavior behind a [`Listener`].
pub trait Handler<A, R>: Send + Sync + 'static {
    fn handle(&self, args: &A) -> Reply<R>;

    /// Asked right before every invocation. A handler that returns `false` is
    /// skipped by dispatch and contributes nothing to the result sequence.
    #[inline]
    fn admit(&self) -> bool {
        true
    }

    /// Whether the handler will never admit another call. Unlike
    /// [`admit`](Handler::admit) this consumes nothing.
    #[inline]
    fn is_spent(&self) -> bool {
        false
    }
}

/// Identity of a listener handle. Clones of a [`Listener`] share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey(u64);

impl ListenerKey {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A registered (or registrable) listener.
///
/// Removal works by identity: pass a clone of the handle that was registered.
/// Registering the same handle twice creates two independent entries.
pub struct Listener<A, R = ()> {
    key: ListenerKey,
    handler: Arc<dyn Handler<A, R>>,
}

impl<A: Payload, R: Send + 'static> Listener<A, R> {
    pub fn new(handler: impl Handler<A, R>) -> Self {
        Self::with_key(ListenerKey::next(), handler)
    }

    pub(crate) fn with_key(key: ListenerKey, handler: impl Handler<A, R>) -> Self {
        Self {
            key,
            handler: Arc::new(handler),
        }
    }
}

impl<A, R> Listener<A, R> {
    #[inline]
    pub fn key(&self) -> ListenerKey {
        self.key
    }
}

impl<A: 'static, R: 'static> Listener<A, R> {
    #[inline]
    pub(crate) fn is_spent(&self) -> bool {
        self.handler.is_spent()
    }

    #[inline]
    pub(crate) fn admit(&self) -> bool {
        self.handler.admit()
    }

    #[inline]
    pub(crate) fn handle(&self, args: &A) -> Reply<R> {
        self.handler.handle(args)
    }

    /// Runs the handler if it still admits calls.
    #[inline]
    pub(crate) fn invoke(&self, args: &A) -> Option<Reply<R>> {
        if self.admit() {
            Some(self.handle(args))
        } else {
            None
        }
    }
}

impl<A, R> Clone for Listener<A, R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<A, R> PartialEq for Listener<A, R> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<A, R> Eq for Listener<A, R> {}

impl<A, R> fmt::Debug for Listener<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("key", &self.key).finish()
    }
}
