//! Giving other types the emitter operations.
//!
//! Two modes:
//! - **type mode**: a host type embeds an [`Emitter`] and implements
//!   [`AsEmitter`]; every value of that type gets the full operation set.
//! - **instance mode**: [`make_emitter`] wraps one value in [`Evented`], which
//!   derefs to the value and carries its own emitter.
//!
//! Every host gets its own registry; nothing is shared between hosts unless
//! they embed clones of the same [`Emitter`].

use crate::event::Payload;
use crate::{Config, Emission, Emitter, Listener, Reply, Result};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Access to an embedded [`Emitter`], with every emitter operation provided
/// on top of it. Operations that return the emitter for chaining return the
/// host instead.
pub trait AsEmitter<A: Payload, R: Send + 'static = ()> {
    fn as_emitter(&self) -> &Emitter<A, R>;

    fn on(&self, event: &str, listener: Listener<A, R>) -> &Self {
        self.as_emitter().on(event, listener);
        self
    }

    fn on_id(&self, event: &str, id: &str, listener: Listener<A, R>) -> &Self {
        self.as_emitter().on_id(event, id, listener);
        self
    }

    fn once(&self, event: &str, listener: Listener<A, R>) -> &Self {
        self.as_emitter().once(event, listener);
        self
    }

    fn once_id(&self, event: &str, id: &str, listener: Listener<A, R>) -> &Self {
        self.as_emitter().once_id(event, id, listener);
        self
    }

    fn many(&self, event: &str, times: usize, listener: Listener<A, R>) -> &Self {
        self.as_emitter().many(event, times, listener);
        self
    }

    fn many_id(&self, event: &str, id: &str, times: usize, listener: Listener<A, R>) -> &Self {
        self.as_emitter().many_id(event, id, times, listener);
        self
    }

    fn overwrite(&self, event: &str, listener: Listener<A, R>) -> &Self {
        self.as_emitter().overwrite(event, listener);
        self
    }

    fn overwrite_id(&self, event: &str, id: &str, listener: Listener<A, R>) -> &Self {
        self.as_emitter().overwrite_id(event, id, listener);
        self
    }

    fn off(&self, event: &str, listener: &Listener<A, R>) -> &Self {
        self.as_emitter().off(event, listener);
        self
    }

    fn off_id(&self, event: &str, id: &str, listener: &Listener<A, R>) -> &Self {
        self.as_emitter().off_id(event, id, listener);
        self
    }

    fn clear(&self, event: &str) -> &Self {
        self.as_emitter().clear(event);
        self
    }

    fn clear_id(&self, event: &str, id: &str) -> &Self {
        self.as_emitter().clear_id(event, id);
        self
    }

    fn emit(&self, event: &str, args: A) -> Emission<R> {
        self.as_emitter().emit(event, args)
    }

    fn emit_id(&self, event: &str, id: &str, args: A) -> Emission<R> {
        self.as_emitter().emit_id(event, id, args)
    }

    fn rpc(&self, event: &str, args: A) -> Result<Reply<R>> {
        self.as_emitter().rpc(event, args)
    }

    fn rpc_id(&self, event: &str, id: &str, args: A) -> Result<Reply<R>> {
        self.as_emitter().rpc_id(event, id, args)
    }

    fn emit_static(&self, event: &str, args: A) -> &Self {
        self.as_emitter().emit_static(event, args);
        self
    }

    fn emit_static_id(&self, event: &str, id: &str, args: A) -> Result<&Self> {
        self.as_emitter().emit_static_id(event, id, args)?;
        Ok(self)
    }

    fn cancel_static(&self, event: &str) -> &Self {
        self.as_emitter().cancel_static(event);
        self
    }

    fn will_emit(&self, event: &str) -> bool {
        self.as_emitter().will_emit(event)
    }

    fn will_emit_id(&self, event: &str, id: &str) -> bool {
        self.as_emitter().will_emit_id(event, id)
    }

    fn defer_emit(&self, event: &str, args: A) -> &Self {
        self.as_emitter().defer_emit(event, args);
        self
    }
}

impl<A: Payload, R: Send + 'static> AsEmitter<A, R> for Emitter<A, R> {
    #[inline]
    fn as_emitter(&self) -> &Emitter<A, R> {
        self
    }
}

/// A value paired with its own emitter.
pub struct Evented<T, A, R = ()> {
    value: T,
    emitter: Emitter<A, R>,
}

impl<T, A: Payload, R: Send + 'static> Evented<T, A, R> {
    pub fn new(value: T) -> Self {
        Self::with_config(value, Config::default())
    }

    pub fn with_config(value: T, config: Config) -> Self {
        Self {
            value,
            emitter: Emitter::with_config(config),
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, A: Payload, R: Send + 'static> AsEmitter<A, R> for Evented<T, A, R> {
    #[inline]
    fn as_emitter(&self) -> &Emitter<A, R> {
        &self.emitter
    }
}

impl<T, A, R> Deref for Evented<T, A, R> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T, A, R> DerefMut for Evented<T, A, R> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: fmt::Debug, A, R> fmt::Debug for Evented<T, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evented")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Gives `value` its own emitter (instance mode).
pub fn make_emitter<T, A: Payload, R: Send + 'static>(value: T) -> Evented<T, A, R> {
    Evented::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_fn;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Collection {
        name: String,
        events: Emitter<String>,
    }

    impl AsEmitter<String> for Collection {
        fn as_emitter(&self) -> &Emitter<String> {
            &self.events
        }
    }

    fn counter() -> (Arc<AtomicUsize>, Listener<String>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let hits = calls.clone();
        let listener = from_fn(move |_: &String| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        (calls, listener)
    }

    #[test]
    fn host_type_gets_every_operation() {
        let users = Collection {
            name: "users".into(),
            events: Emitter::new(),
        };
        let (calls, listener) = counter();

        users
            .on("insert", listener.clone())
            .on_id("insert", "u-1", listener.clone());
        assert!(users.will_emit("insert"));

        assert_eq!(users.emit_id("insert", "u-1", users.name.clone()).len(), 2);
        users.off("insert", &listener).off_id("insert", "u-1", &listener);
        assert!(!users.will_emit_id("insert", "u-1"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn hosts_do_not_share_registries() {
        let a = Collection {
            name: "a".into(),
            events: Emitter::new(),
        };
        let b = Collection {
            name: "b".into(),
            events: Emitter::new(),
        };
        let (calls, listener) = counter();

        a.on("insert", listener);
        b.emit("insert", b.name.clone());

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!b.will_emit("insert"));
    }

    #[test]
    fn instance_mode_wraps_a_value() {
        let mut doc: Evented<Vec<u8>, String> = make_emitter(vec![1, 2]);
        let (calls, listener) = counter();

        doc.push(3);
        doc.once("change", listener);
        doc.emit("change", "pushed".into());
        doc.emit("change", "again".into());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn instance_mode_takes_a_config() {
        let config = Config {
            defer: crate::DeferSwitch::new(false),
            ..Config::default()
        };
        let doc: Evented<&str, String> = Evented::with_config("draft", config);
        let (calls, listener) = counter();

        doc.on("saved", listener).defer_emit("saved", "now".into());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*doc, "draft");
    }

    #[test]
    fn static_id_errors_pass_through() {
        let doc: Evented<(), String> = make_emitter(());
        assert!(doc.emit_static_id("loaded", "", "x".into()).is_err());
        assert!(doc.emit_static_id("loaded", "d-1", "x".into()).is_ok());
    }
}
